//! Standard values used across tests for stations, devices and contacts.

/// Station token admitted by the default test configuration.
pub static TEST_STATION: &str = "entrance-a";

/// Station token admitted by the default test configuration, used for checkout flows.
pub static TEST_CHECKOUT_STATION: &str = "checkout-a";

/// Station token that is never admitted.
pub static TEST_UNKNOWN_STATION: &str = "side-door";

/// Device identifier reported by the scanning tablet in tests.
pub static TEST_DEVICE: &str = "tablet-1";

/// Volunteer recorded as the actor confirming check-ins.
pub static TEST_ACTOR: &str = "vol1";

/// Scan code issued to the first test household's child.
pub static TEST_SCAN_CODE: &str = "KID-001";

/// Country code applied to local numbers in tests.
pub static TEST_COUNTRY_CODE: &str = "1";
