//! Target platforms and the per-platform subprocess environment.

/// Cross compiler used for Windows targets when cgo is enabled.
pub const WINDOWS_CC: &str = "x86_64-w64-mingw32-gcc";

/// A `GOOS` the tools can be run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Darwin,
    Linux,
    Windows,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Darwin, Platform::Linux, Platform::Windows];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "darwin" => Some(Platform::Darwin),
            "linux" => Some(Platform::Linux),
            "windows" => Some(Platform::Windows),
            _ => None,
        }
    }

    /// The platform this process runs on, if it is one of the supported ones.
    pub fn host() -> Option<Self> {
        Self::parse(host_goos())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `GOOS` spelling of the host operating system.
pub fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        os => os,
    }
}

/// Environment overrides for every subprocess spawned for one platform.
///
/// The overrides are handed to each spawn instead of being written into
/// the process environment, so contexts for different platforms never
/// interfere with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    goos: String,
    env: Vec<(String, String)>,
}

impl RunContext {
    /// Context targeting `platform`, with the C toolchain configured when
    /// `cgo` is set.
    pub fn for_platform(platform: Platform, cgo: bool) -> Self {
        let mut env = vec![("GOOS".to_string(), platform.as_str().to_string())];

        if cgo {
            let cc = match platform {
                Platform::Windows => WINDOWS_CC,
                _ => "",
            };
            env.push(("CC".to_string(), cc.to_string()));
            env.push(("CGO_ENABLED".to_string(), "1".to_string()));
        }

        Self {
            goos: platform.as_str().to_string(),
            env,
        }
    }

    /// Context targeting the host.
    pub fn host() -> Self {
        Self {
            goos: host_goos().to_string(),
            env: vec![("GOOS".to_string(), host_goos().to_string())],
        }
    }

    pub fn goos(&self) -> &str {
        &self.goos
    }

    pub fn envs(&self) -> &[(String, String)] {
        &self.env
    }

    /// Value of an override, if set.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
