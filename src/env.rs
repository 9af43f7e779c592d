use std::sync::OnceLock;

/// Environment variable which enables index validation in release builds.
pub const VALIDATE_ENV_VAR: &str = "FE_ARRAY_VALIDATE";

/// Parse a boolean flag value.
///
/// Accepts `1`, `true`, `t`, `yes` and `y` for true and their negations for
/// false. Anything else is reported on stderr and read as false.
pub fn str_as_bool(s: &str) -> bool {
    match s {
        "1" | "true" | "t" | "yes" | "y" => true,
        "0" | "false" | "f" | "no" | "n" => false,
        other => {
            eprintln!("fe_array: ignoring unrecognized flag value \"{}\"", other);
            false
        }
    }
}

/// Read the boolean environment variable `name`, or `default` if it is unset
/// or not valid unicode.
pub fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => str_as_bool(&value),
        Err(_) => default,
    }
}

/// Return true if filter entries and record indices should be bounds-checked
/// when filters are built.
///
/// Checks are always on in debug builds and when the `validate` feature is
/// enabled. Otherwise they are controlled by [`VALIDATE_ENV_VAR`], which is
/// read once per process.
pub fn validation_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        cfg!(debug_assertions) || cfg!(feature = "validate") || env_flag(VALIDATE_ENV_VAR, false)
    })
}
