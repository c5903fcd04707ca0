// Per-area debug switches. Flip one to `true` while working on that area;
// everything behind a disabled flag compiles down to nothing.

pub const DEBUG_PICKER: bool = false; // filter changes and listing completions
pub const DEBUG_CATALOG: bool = false; // catalog fetches
pub const DEBUG_FORM: bool = false; // proposal form events
pub const DEBUG_CONNECTION: bool = false; // backend messages

#[macro_export]
macro_rules! debug_log {
    ($flag:expr, $($arg:tt)*) => {
        if $flag {
            zoon::println!($($arg)*);
        }
    };
}
