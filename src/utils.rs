use std::fmt::Display;

pub trait LogError<T> {
    /// Drop the error into the debug log and keep going with `None`.
    fn ok_or_log(self, ctx: &str) -> Option<T>;
}

impl<T, E> LogError<T> for Result<T, E> where E: Display {
    fn ok_or_log(self, ctx: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                log::debug!("{}: {}", ctx, e);
                None
            }
        }
    }
}
