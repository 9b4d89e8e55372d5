use snafu::Snafu;

/// The public Error type for this library.
#[derive(Debug, Snafu)]
pub struct Error(LibError);

impl Error {
    /// `true` if this error originated from the underlying byte stream rather than from a
    /// format or capacity violation.
    pub fn is_io(&self) -> bool {
        matches!(self.0, LibError::Io { .. })
    }

    /// `true` if this error is a structural/magic-byte/size violation in the data itself.
    pub fn is_format(&self) -> bool {
        matches!(self.0, LibError::Format { .. })
    }

    /// `true` if this error means a song could not fit in the available blocks.
    pub fn is_capacity(&self) -> bool {
        matches!(self.0, LibError::Capacity { .. })
    }
}

/// The public Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// The internal Result type for this library.
pub(crate) type LibResult<T> = std::result::Result<T, LibError>;

/// The internal Error type for this library.
#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub(crate) enum LibError {
    #[snafu(display("{}: io error: {}", site, source))]
    Io {
        site: String,
        source: std::io::Error,
    },

    #[snafu(display("{}: {}", site, description))]
    Format { site: String, description: String },

    #[snafu(display("{}: song does not fit in the remaining blocks: {}", site, description))]
    Capacity { site: String, description: String },
}

macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

macro_rules! io {
    () => {
        crate::error::Io { site: site!() }
    };
}

macro_rules! fmt_s {
    () => {
        crate::error::Format {
            site: site!(),
            description: "[no description]",
        }
    };
    ($msg:expr) => {
        crate::error::Format {
            site: site!(),
            description: $msg,
        }
    };
    ($fmt:expr, $($arg:expr),+) => {
        crate::error::Format {
            site: site!(),
            description: format!($fmt, $($arg),+),
        }
    };
}

macro_rules! fmt_e {
    () => {
        fmt_s!().build()
    };
    ($msg:expr) => {
        fmt_s!($msg).build()
    };
    ($fmt:expr, $($arg:expr),+) => {
        fmt_s!($fmt, $($arg),+).build()
    };
}

macro_rules! fmt_err {
    () => {
        return Err(fmt_e!());
    };
    ($msg:expr) => {
        return Err(fmt_e!($msg))
    };
    ($fmt:expr, $($arg:expr),+) => {
        return Err(fmt_e!($fmt, $($arg),+))
    };
}

macro_rules! cap_e {
    ($msg:expr) => {
        crate::error::Capacity {
            site: site!(),
            description: $msg,
        }
        .build()
    };
}

#[test]
fn site_test() {
    let line = line!() + 1;
    let site = site!();
    assert!(site.contains("error.rs"));
    assert!(site.contains(format!("{}", line).as_str()));
}

#[test]
fn fmt_err_macro_test_message() {
    fn foo() -> LibResult<u64> {
        let flerbin = String::from("flerbin");
        fmt_err!(flerbin);
    }
    let result = foo();
    assert!(result.is_err());
    let message = format!("{}", result.err().unwrap());
    assert!(message.as_str().contains("flerbin"));
}

#[test]
fn fmt_err_macro_test_fmt() {
    fn foo() -> LibResult<u64> {
        fmt_err!("hello {}, {}", "world", String::from("foo"));
    }
    let result = foo();
    assert!(result.is_err());
    let message = format!("{}", result.err().unwrap());
    assert!(message.as_str().contains("hello world, foo"));
}

#[test]
fn capacity_error_test() {
    let e: LibError = cap_e!("no blocks left");
    assert!(matches!(e, LibError::Capacity { .. }));
}
