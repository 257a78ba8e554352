use std::env;

/// Overrides environment variables until dropped.
///
/// `None` unsets a variable. Previous values come back on drop, so a failing
/// assertion does not leak `VARASTO_*` settings into the next test.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn new(vars: &[(&str, Option<&str>)]) -> Self {
        let saved = vars
            .iter()
            .map(|(key, value)| {
                let old = env::var(key).ok();
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
                (key.to_string(), old)
            })
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in self.saved.drain(..).rev() {
            match old {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_guard_restores_after_panic() {
        let _outer = EnvGuard::new(&[("VARASTO_GUARD_TEST", Some("before"))]);

        let result = panic::catch_unwind(|| {
            let _inner = EnvGuard::new(&[("VARASTO_GUARD_TEST", Some("during"))]);
            assert_eq!(env::var("VARASTO_GUARD_TEST").unwrap(), "during");
            panic!("test body failed");
        });

        assert!(result.is_err());
        assert_eq!(env::var("VARASTO_GUARD_TEST").unwrap(), "before");
    }

    #[test]
    #[serial]
    fn test_guard_unsets_and_restores() {
        {
            let _guard = EnvGuard::new(&[("VARASTO_GUARD_TEST", None)]);
            assert!(env::var("VARASTO_GUARD_TEST").is_err());
        }
        assert!(env::var("VARASTO_GUARD_TEST").is_err());
    }
}
