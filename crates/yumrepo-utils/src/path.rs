use std::{env, path::PathBuf};

use crate::error::{PathError, PathResult};

pub trait PathResolver {
    /// Resolves a path string that may contain environment variables
    ///
    /// This method expands environment variables in the format `$VAR` or `${VAR}`, resolves tilde
    /// (`~`) to the user's home directory when it appears at the start of the path, and converts
    /// relative paths to absolute paths based on the current working directory.
    ///
    /// # Errors
    ///
    /// * [`PathError::Empty`] if the path is empty
    /// * [`PathError::CurrentDir`] if the current directory cannot be determined
    /// * [`PathError::MissingEnvVar`] if the environment variables are undefined
    ///
    /// # Example
    ///
    /// ```
    /// use yumrepo_utils::error::PathResult;
    /// use yumrepo_utils::path::{PathResolver, SystemPathResolver};
    ///
    /// fn main() -> PathResult<()> {
    ///     let resolved = SystemPathResolver.resolve_path("~/yum-cache")?;
    ///     assert!(resolved.is_absolute());
    ///     Ok(())
    /// }
    /// ```
    fn resolve_path(&self, path: &str) -> PathResult<PathBuf>;

    /// Returns the user's home directory
    ///
    /// This method checks the `HOME` environment variable. If it is not set (as is common for
    /// service accounts running build agents), it falls back to the OS temp directory.
    fn home_dir(&self) -> PathBuf;

    /// Returns the user's config directory following XDG Base Directory Specification
    ///
    /// This method checks the `XDG_CONFIG_HOME` environment variable. If not set, it defaults to
    /// `$HOME/.config`
    fn xdg_config_home(&self) -> PathBuf;
}

/// The default [`PathResolver`] implementation using environment variables and filesystem calls.
pub struct SystemPathResolver;

impl PathResolver for SystemPathResolver {
    fn resolve_path(&self, path: &str) -> PathResult<PathBuf> {
        let path = path.trim();

        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let resolved = self.expand_variables(path)?;
        let path_buf = PathBuf::from(resolved);

        if path_buf.is_absolute() {
            Ok(path_buf)
        } else {
            env::current_dir()
                .map(|cwd| cwd.join(path_buf))
                .map_err(|err| PathError::CurrentDir { source: err })
        }
    }

    fn home_dir(&self) -> PathBuf {
        env::var("HOME")
            .ok()
            .filter(|home| !home.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir)
    }

    fn xdg_config_home(&self) -> PathBuf {
        env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| self.home_dir().join(".config"))
    }
}

impl SystemPathResolver {
    fn expand_variables(&self, path: &str) -> PathResult<String> {
        let mut result = String::with_capacity(path.len());
        let mut chars = path.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '$' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        let var_name = self.consume_until(&mut chars, '}')?;
                        self.expand_env_var(&var_name, &mut result, path)?;
                    } else {
                        let var_name = self.consume_var_name(&mut chars);
                        if var_name.is_empty() {
                            result.push('$');
                        } else {
                            self.expand_env_var(&var_name, &mut result, path)?;
                        }
                    }
                }
                '~' if result.is_empty() => result.push_str(&self.home_dir().to_string_lossy()),
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    fn consume_until(
        &self,
        chars: &mut std::iter::Peekable<std::str::Chars>,
        delimiter: char,
    ) -> PathResult<String> {
        let mut var_name = String::new();

        for c in chars.by_ref() {
            if c == delimiter {
                return Ok(var_name);
            }
            var_name.push(c);
        }

        Err(PathError::UnclosedVariable {
            input: format!("${{{var_name}"),
        })
    }

    fn consume_var_name(&self, chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
        let mut var_name = String::new();

        while let Some(&c) = chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                var_name.push(c);
                chars.next();
            } else {
                break;
            }
        }

        var_name
    }

    fn expand_env_var(
        &self,
        var_name: &str,
        result: &mut String,
        original: &str,
    ) -> PathResult<()> {
        match var_name {
            "HOME" => result.push_str(&self.home_dir().to_string_lossy()),
            "XDG_CONFIG_HOME" => result.push_str(&self.xdg_config_home().to_string_lossy()),
            _ => {
                let value = env::var(var_name).map_err(|_| PathError::MissingEnvVar {
                    input: original.into(),
                    var: var_name.into(),
                })?;
                result.push_str(&value);
            }
        }
        Ok(())
    }
}

/// Resolves a path string using the system path resolver.
///
/// See [`PathResolver::resolve_path`] for detailed documentation.
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    SystemPathResolver.resolve_path(path)
}

/// Returns the user's home directory using the system path resolver.
///
/// See [`PathResolver::home_dir`] for detailed documentation.
pub fn home_dir() -> PathBuf {
    SystemPathResolver.home_dir()
}

/// Returns the user's config directory using the system path resolver.
///
/// See [`PathResolver::xdg_config_home`] for detailed documentation.
pub fn xdg_config_home() -> PathBuf {
    SystemPathResolver.xdg_config_home()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_vars<F>(vars: &[(&str, Option<&str>)], f: F)
    where
        F: FnOnce(),
    {
        let old: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();
        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        f();

        for (key, value) in old {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_expand_variables_simple() {
        with_vars(&[("YUMREPO_TEST_VAR", Some("test_value"))], || {
            let result = SystemPathResolver
                .expand_variables("$YUMREPO_TEST_VAR/path")
                .unwrap();
            assert_eq!(result, "test_value/path");
        });
    }

    #[test]
    #[serial]
    fn test_expand_variables_braces_and_tilde() {
        with_vars(
            &[("HOME", Some("/home/builder")), ("YUMREPO_TEST_VAR", Some("x"))],
            || {
                let result = SystemPathResolver
                    .expand_variables("~/cache/${YUMREPO_TEST_VAR}")
                    .unwrap();
                assert_eq!(result, "/home/builder/cache/x");
            },
        );
    }

    #[test]
    #[serial]
    fn test_expand_variables_missing_var() {
        with_vars(&[("YUMREPO_MISSING_VAR", None)], || {
            let result = SystemPathResolver.expand_variables("$YUMREPO_MISSING_VAR/x");
            assert!(matches!(result, Err(PathError::MissingEnvVar { .. })));
        });
    }

    #[test]
    fn test_expand_variables_unclosed() {
        let result = SystemPathResolver.expand_variables("${HOME");
        assert!(matches!(result, Err(PathError::UnclosedVariable { .. })));
    }

    #[test]
    fn test_resolve_path_empty() {
        assert!(matches!(resolve_path("   "), Err(PathError::Empty)));
    }

    #[test]
    fn test_resolve_relative_path_is_absolute() {
        let resolved = resolve_path("some/relative").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/relative"));
    }

    #[test]
    #[serial]
    fn test_home_dir_falls_back_to_temp_dir() {
        with_vars(&[("HOME", None)], || {
            assert_eq!(home_dir(), env::temp_dir());
        });
        with_vars(&[("HOME", Some(""))], || {
            assert_eq!(home_dir(), env::temp_dir());
        });
    }

    #[test]
    #[serial]
    fn test_home_dir_from_env() {
        with_vars(&[("HOME", Some("/Users/ali"))], || {
            assert_eq!(home_dir(), PathBuf::from("/Users/ali"));
        });
    }

    #[test]
    #[serial]
    fn test_xdg_config_home_default() {
        with_vars(
            &[("XDG_CONFIG_HOME", None), ("HOME", Some("/home/builder"))],
            || {
                assert_eq!(xdg_config_home(), PathBuf::from("/home/builder/.config"));
            },
        );
    }
}
