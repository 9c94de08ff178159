//! System log sink for run notices (start, completion, interruption).
//!
//! Built on libc `openlog`/`syslog`/`closelog`. Every message is also emitted
//! as a `tracing` event so it shows up on stderr at `info` verbosity. On
//! platforms without syslog only the `tracing` event is produced.

use std::fmt;

/// Identifier every notice is tagged with.
pub const SYSLOG_IDENT_DEFAULT: &str = "RecursiveFileCopy";

/// Syslog facility codes used by this tool.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SyslogFacility {
    /// `LOG_USER`, the default for user commands.
    #[default]
    User,
    /// `LOG_DAEMON`.
    Daemon,
    /// `LOG_LOCAL0`.
    Local0,
}

impl SyslogFacility {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "daemon" => Some(Self::Daemon),
            "local0" => Some(Self::Local0),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Daemon => "daemon",
            Self::Local0 => "local0",
        }
    }

    #[cfg(unix)]
    const fn as_raw(self) -> libc::c_int {
        match self {
            Self::User => libc::LOG_USER,
            Self::Daemon => libc::LOG_DAEMON,
            Self::Local0 => libc::LOG_LOCAL0,
        }
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facility and ident passed to `openlog(3)`.
///
/// Constructing a config does not open anything; see [`SyslogConfig::open`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyslogConfig {
    facility: SyslogFacility,
    ident: String,
}

impl SyslogConfig {
    pub fn new(facility: SyslogFacility, ident: impl Into<String>) -> Self {
        Self {
            facility,
            ident: ident.into(),
        }
    }

    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Open the syslog connection with `LOG_PID | LOG_CONS`.
    ///
    /// Call once, before any other thread could log. The connection stays
    /// open until the returned guard is dropped.
    pub fn open(&self) -> SyslogGuard {
        SyslogGuard::open(self)
    }
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self::new(SyslogFacility::User, SYSLOG_IDENT_DEFAULT)
    }
}

/// Open syslog connection; `closelog(3)` runs on drop.
#[derive(Debug)]
pub struct SyslogGuard {
    /// `openlog(3)` keeps this pointer, so it must outlive the connection.
    #[cfg(unix)]
    _ident: std::ffi::CString,
}

impl SyslogGuard {
    #[cfg(unix)]
    fn open(config: &SyslogConfig) -> Self {
        let ident = std::ffi::CString::new(config.ident.as_str()).unwrap_or_else(|_| {
            std::ffi::CString::new(SYSLOG_IDENT_DEFAULT).unwrap_or_default()
        });
        // SAFETY: `ident` is a valid C string owned by the guard, which outlives
        // every `syslog` call made through it and is released after `closelog`.
        unsafe {
            libc::openlog(
                ident.as_ptr(),
                libc::LOG_PID | libc::LOG_CONS,
                config.facility.as_raw(),
            );
        }
        Self { _ident: ident }
    }

    #[cfg(not(unix))]
    fn open(_config: &SyslogConfig) -> Self {
        Self {}
    }

    /// Send `message` at `LOG_INFO`, mirrored as a `tracing` event.
    pub fn info(&self, message: &str) {
        tracing::info!("{message}");
        self.send(message);
    }

    #[cfg(unix)]
    fn send(&self, message: &str) {
        let c_message = to_c_message(message);
        // `%s` keeps `%` in the message from being read as a directive.
        // SAFETY: the connection is open while `self` lives; both arguments are
        // valid NUL-terminated strings.
        unsafe {
            libc::syslog(libc::LOG_INFO, c"%s".as_ptr(), c_message.as_ptr());
        }
    }

    #[cfg(not(unix))]
    fn send(&self, _message: &str) {}
}

/// Interior NUL bytes would truncate the entry; they are dropped.
#[cfg(unix)]
fn to_c_message(message: &str) -> std::ffi::CString {
    let raw: Vec<u8> = message.bytes().filter(|&b| b != 0).collect();
    std::ffi::CString::new(raw).unwrap_or_default()
}

#[cfg(unix)]
impl Drop for SyslogGuard {
    fn drop(&mut self) {
        // SAFETY: `closelog` has no preconditions.
        unsafe {
            libc::closelog();
        }
    }
}
