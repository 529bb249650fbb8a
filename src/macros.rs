//! A small handful of helper macros

#[cfg(test)]
use std::sync::atomic::AtomicBool;

// Macro that is `unreachable!` in debug mode, but `unreachable_unchecked` in release mode.
macro_rules! weak_unreachable {
    ($($tt:tt)*) => {{
        if cfg!(debug_assertions) {
            unreachable!($($tt)*);
        } else {
            std::hint::unreachable_unchecked()
        }
    }};
}

#[cfg(test)]
pub(crate) static DEBUG: AtomicBool = AtomicBool::new(false);

#[cfg(test)]
macro_rules! enable_debug {
    () => {{
        $crate::macros::DEBUG.store(true, std::sync::atomic::Ordering::SeqCst);
    }};
}

#[cfg(test)]
macro_rules! disable_debug {
    () => {{
        $crate::macros::DEBUG.store(false, std::sync::atomic::Ordering::SeqCst);
    }};
}

// Prints only in tests, and only after `enable_debug!()`. Outside of tests, the arguments are
// never evaluated.
macro_rules! debug_println {
    ($($args:tt)*) => {
        #[cfg(test)]
        {
            if $crate::macros::DEBUG.load(std::sync::atomic::Ordering::SeqCst) {
                println!($($args)*);
            }
        };
    };
}
