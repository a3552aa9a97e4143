//! Per-OS install mechanism tables.
//!
//! Platform dispatch is a closed enum; each (platform, asset kind) pair maps
//! to a fixed, ordered list of mechanisms held as data, so the fallthrough
//! algorithm in `standard.rs` stays uniform across platforms.

use std::path::Path;

/// Operating systems the dispatcher supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    /// Desktop Linux.
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
    /// Android (standard path is the system package installer prompt).
    Android,
}

impl Platform {
    /// Detect the platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Name used in diagnostics and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Android => "android",
        }
    }

    /// File extensions this platform can install.
    #[must_use]
    pub const fn supported_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Linux => &["appimage", "deb", "rpm"],
            Self::MacOs => &["dmg", "pkg"],
            Self::Windows => &["msi", "exe"],
            Self::Android => &["apk"],
        }
    }

    /// Whether this asset kind needs the unknown-sources style install
    /// grant when the privileged path is not in use.
    #[must_use]
    pub fn needs_install_grant(self, kind: &str) -> bool {
        self == Self::Android && kind == "apk"
    }

    /// Ordered standard-install mechanisms for an asset kind, or `None`
    /// when the kind is not supported on this platform.
    ///
    /// AppImage is absent here on purpose: it is the one two-phase path
    /// (placed into the drop location, not launched through a tool) and is
    /// handled before mechanism dispatch.
    #[must_use]
    pub fn mechanisms(self, kind: &str) -> Option<Vec<Mechanism>> {
        let list = match (self, kind) {
            (Self::Windows, "msi") => vec![
                Mechanism::tool("msiexec", &["/i"]),
                Mechanism::OpenDefault,
            ],
            // Installer executables are opened, or run directly when no
            // handler association exists.
            (Self::Windows, "exe") => vec![Mechanism::OpenDefault, Mechanism::RunFile],
            (Self::MacOs, "dmg" | "pkg") => {
                vec![Mechanism::tool("open", &[]), Mechanism::OpenDefault]
            }
            (Self::Linux, "deb") => vec![
                Mechanism::tool("gdebi-gtk", &[]),
                Mechanism::OpenDefault,
                Mechanism::terminal_prompt("dpkg"),
            ],
            (Self::Linux, "rpm") => vec![
                Mechanism::OpenDefault,
                Mechanism::terminal_prompt("rpm"),
            ],
            (Self::Android, "apk") => vec![Mechanism::OpenDefault],
            _ => return None,
        };
        Some(list)
    }
}

/// One way of handing an installable file to the OS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mechanism {
    /// Launch a specific tool with the file appended to `args`.
    Tool {
        /// Program name, resolved on `PATH`.
        program: &'static str,
        /// Arguments preceding the file path.
        args: &'static [&'static str],
    },
    /// Open the file with the system default handler.
    OpenDefault,
    /// Execute the file itself (Windows installer executables).
    RunFile,
    /// Last resort: open a terminal emulator with the privileged install
    /// command pre-filled for the user to confirm.
    TerminalPrompt {
        /// Package tool to invoke under sudo (e.g. `dpkg`, `rpm`).
        package_tool: &'static str,
    },
}

/// Terminal emulators tried for [`Mechanism::TerminalPrompt`], in order.
/// Each entry is the program plus the flag that introduces its command.
pub const TERMINALS: &[(&str, &str)] = &[
    ("gnome-terminal", "--"),
    ("konsole", "-e"),
    ("xterm", "-e"),
];

impl Mechanism {
    const fn tool(program: &'static str, args: &'static [&'static str]) -> Self {
        Self::Tool { program, args }
    }

    const fn terminal_prompt(package_tool: &'static str) -> Self {
        Self::TerminalPrompt { package_tool }
    }

    /// Mechanism name used in diagnostics and `InstallFailed` errors.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Tool { program, .. } => (*program).to_string(),
            Self::OpenDefault => "default-handler".to_string(),
            Self::RunFile => "run-file".to_string(),
            Self::TerminalPrompt { package_tool } => format!("terminal({package_tool})"),
        }
    }

    /// Shell command pre-filled into the terminal prompt.
    #[must_use]
    pub fn terminal_command(package_tool: &str, file: &Path) -> String {
        format!(
            "sudo {package_tool} -i {}; read -p 'Press Enter to close...'",
            file.display()
        )
    }
}
