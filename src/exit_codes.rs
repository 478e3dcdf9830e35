//! Exit code constants for the podsvc CLI.
//!
//! - 0: Success (including a declined confirmation)
//! - 1: User error (validation failure, missing dependency, pull or reload failure)
//! - 2: Activation failure (the unit file was written but the service did not come up)

/// Successful execution, or the operator declined to proceed.
pub const SUCCESS: i32 = 0;

/// User error: invalid input, missing dependency, image pull or daemon-reload failure.
pub const USER_ERROR: i32 = 1;

/// The unit file is in place but the service failed to start or become active.
pub const ACTIVATION_FAILURE: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, ACTIVATION_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn failure_codes_are_nonzero() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(USER_ERROR, 1);
        assert_eq!(ACTIVATION_FAILURE, 2);
    }
}
