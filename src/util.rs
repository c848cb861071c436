use std::{env, str::FromStr as _, sync::OnceLock};
use unicode_width::UnicodeWidthStr;

lazy_static::lazy_static! {
    pub static ref ENV: EnvVars = EnvVars::default();
}

/// Gets the value of the provided environment variable name and converts it to a boolean value. A
/// environment variable's value is considered `true` if it's value is a positive, non-zero integer.
pub fn envvar_to_bool(varname: &str) -> bool {
    match env::var(varname) {
        Err(_) => false,
        Ok(v) => {
            if let Ok(n) = usize::from_str(&v) {
                n != 0
            } else {
                false
            }
        }
    }
}

/// I know there's a better way to do this, but I don't want to deal with finding it right now.
pub fn safe_string_truncate(s: &str, target_size: usize) -> String {
    let mut s = String::from(s);
    let mut cur_width = s.width();
    while cur_width > target_size {
        if s.pop().is_none() {
            break;
        }
        cur_width = s.width();
    }
    s
}

#[derive(Debug, Default)]
pub struct EnvVars {
    hide_progress_bars: OnceLock<bool>,
    unwrap_errors: OnceLock<bool>,
    ffmpeg_path: OnceLock<String>,
    ffprobe_path: OnceLock<String>,
}

macro_rules! env_var_bool_getter {
    ($field:ident, $var_name:literal) => {
        pub fn $field(&self) -> bool {
            *self.$field.get_or_init(|| envvar_to_bool($var_name))
        }
    };
}

macro_rules! env_var_str_getter {
    ($field:ident, $var_name:literal, $default:literal) => {
        pub fn $field(&self) -> &str {
            self.$field
                .get_or_init(|| env::var($var_name).unwrap_or(String::from($default)))
        }
    };
}

impl EnvVars {
    env_var_bool_getter! {hide_progress_bars, "HIDE_PROGRESS_BARS"}
    env_var_bool_getter! {unwrap_errors, "UNWRAP_ERRORS"}
    env_var_str_getter! {ffmpeg_path, "FFMPEG", "ffmpeg"}
    env_var_str_getter! {ffprobe_path, "FFPROBE", "ffprobe"}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::set_var;

    #[test]
    fn test_envvar_to_bool() {
        set_var("MK_FRAMES_TEST_VAR", "1");
        assert!(envvar_to_bool("MK_FRAMES_TEST_VAR"));
        set_var("MK_FRAMES_TEST_VAR", "2");
        assert!(envvar_to_bool("MK_FRAMES_TEST_VAR"));
        set_var("MK_FRAMES_TEST_VAR", "0");
        assert!(!envvar_to_bool("MK_FRAMES_TEST_VAR"));
        set_var("MK_FRAMES_TEST_VAR", "");
        assert!(!envvar_to_bool("MK_FRAMES_TEST_VAR"));
        set_var("MK_FRAMES_TEST_VAR", "bad-input");
        assert!(!envvar_to_bool("MK_FRAMES_TEST_VAR"));
    }

    #[test]
    fn test_safe_string_truncate() {
        assert_eq!(safe_string_truncate("playlist.m3u8", 8), "playlist");
        assert_eq!(safe_string_truncate("short", 100), "short");
        assert_eq!(safe_string_truncate("", 4), "");
    }
}
