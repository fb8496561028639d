macro_rules! validate {
    ($cond:expr) => {
        if !$cond {
            return Err($crate::error::Error::ValidationError(
                concat!("Validation failed (condition: ", stringify!($cond), ")").to_string(),
            ));
        }
    };
    ($cond:expr, $msg: literal) => {
        if !$cond {
            return Err($crate::error::Error::ValidationError(
                concat!("Validation failed: ", $msg, " (condition: ", stringify!($cond), ")").to_string(),
            ));
        }
    };
}
pub(crate) use validate;

macro_rules! format_c_defines {
    ($($key:expr => $val:expr),* $(,)?) => {
        format!(concat!($("#define ", $key, " {}\n" ,)*), $( $val ,)*)
    };
}
pub(crate) use format_c_defines;

macro_rules! wrap_cl_error {
    ($res: expr, $stage:expr, $($arg:tt)*) => {
        ($res).map_err(|err| $crate::error::Error::from_cl_err(err, $stage, format!($($arg)*)))
    }
}
pub(crate) use wrap_cl_error;
