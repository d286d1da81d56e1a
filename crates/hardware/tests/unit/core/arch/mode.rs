//! Operating mode derivation tests.

use vrsim_core::common::error::SimError;
use vrsim_core::core::arch::cp0::status;
use vrsim_core::core::arch::mode::OperatingMode;

#[test]
fn ksu_selects_privilege_level() {
    assert_eq!(
        OperatingMode::from_status(status::KSU_KERNEL << status::KSU_SHIFT).unwrap(),
        OperatingMode::Kernel32
    );
    assert_eq!(
        OperatingMode::from_status(status::KSU_SUPERVISOR << status::KSU_SHIFT).unwrap(),
        OperatingMode::Supervisor32
    );
    assert_eq!(
        OperatingMode::from_status(status::KSU_USER << status::KSU_SHIFT).unwrap(),
        OperatingMode::User32
    );
}

#[test]
fn width_bits_select_64_bit_variants() {
    assert_eq!(
        OperatingMode::from_status(status::KX).unwrap(),
        OperatingMode::Kernel64
    );
    assert_eq!(
        OperatingMode::from_status((status::KSU_SUPERVISOR << status::KSU_SHIFT) | status::SX)
            .unwrap(),
        OperatingMode::Supervisor64
    );
    assert_eq!(
        OperatingMode::from_status((status::KSU_USER << status::KSU_SHIFT) | status::UX).unwrap(),
        OperatingMode::User64
    );
}

#[test]
fn exception_levels_force_kernel() {
    let user = status::KSU_USER << status::KSU_SHIFT;
    assert_eq!(
        OperatingMode::from_status(user | status::EXL).unwrap(),
        OperatingMode::Kernel32
    );
    assert_eq!(
        OperatingMode::from_status(user | status::ERL | status::KX).unwrap(),
        OperatingMode::Kernel64
    );
    // The width in forced-kernel mode comes from KX, not UX.
    assert_eq!(
        OperatingMode::from_status(user | status::EXL | status::UX).unwrap(),
        OperatingMode::Kernel32
    );
}

#[test]
fn reserved_ksu_encoding_is_host_fatal() {
    let status_value = 0b11 << status::KSU_SHIFT;
    assert!(matches!(
        OperatingMode::from_status(status_value),
        Err(SimError::IndeterminateMode(s)) if s == status_value
    ));
}
