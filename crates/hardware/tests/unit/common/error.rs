//! Fault classification tests: cause codes, vectors, and latched
//! addresses.

use vrsim_core::common::error::Fault;

#[test]
fn cause_codes_match_architecture() {
    assert_eq!(Fault::TlbModified(0).cause_code(), 1);
    assert_eq!(Fault::TlbRefillLoad(0).cause_code(), 2);
    assert_eq!(Fault::TlbRefillStore(0).cause_code(), 3);
    assert_eq!(Fault::AddressErrorLoad(0).cause_code(), 4);
    assert_eq!(Fault::AddressErrorStore(0).cause_code(), 5);
    assert_eq!(Fault::Syscall.cause_code(), 8);
    assert_eq!(Fault::Breakpoint.cause_code(), 9);
    assert_eq!(Fault::IntegerOverflow.cause_code(), 12);
}

#[test]
fn refill_faults_use_refill_vector() {
    assert!(Fault::TlbRefillLoad(0).is_refill());
    assert!(Fault::TlbRefillStore(0).is_refill());
    assert!(!Fault::TlbInvalidLoad(0).is_refill());
    assert!(!Fault::AddressErrorLoad(0).is_refill());
}

#[test]
fn bad_vaddr_latched_for_address_and_tlb_faults() {
    assert_eq!(Fault::AddressErrorLoad(0x123).bad_vaddr(), Some(0x123));
    assert_eq!(Fault::TlbInvalidStore(0x456).bad_vaddr(), Some(0x456));
    assert_eq!(Fault::Syscall.bad_vaddr(), None);
    assert_eq!(Fault::IntegerOverflow.bad_vaddr(), None);
}
