#[cfg(any(target_os = "linux", target_os = "macos"))]
use std::process::Command;

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).to_lowercase())
}

/// Whether the desktop prefers a dark colour scheme. Resolves
/// `theme = system`; falls back to light when nothing can be detected.
pub fn system_prefers_dark() -> bool {
    #[cfg(target_os = "linux")]
    {
        // GNOME 42+ exposes the preference directly; older desktops only
        // hint at it through the GTK theme name.
        if let Some(scheme) =
            command_stdout("gsettings", &["get", "org.gnome.desktop.interface", "color-scheme"])
            && scheme.contains("prefer-dark")
        {
            return true;
        }
        if let Some(theme) =
            command_stdout("gsettings", &["get", "org.gnome.desktop.interface", "gtk-theme"])
            && theme.contains("dark")
        {
            return true;
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(style) = command_stdout("defaults", &["read", "-g", "AppleInterfaceStyle"])
            && style.contains("dark")
        {
            return true;
        }
    }

    false
}
