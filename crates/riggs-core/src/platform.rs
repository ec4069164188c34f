use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/riggs/ (XDG standard)
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("riggs")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("riggs")
    }
}

pub fn config_dir() -> PathBuf {
    // On macOS and Linux, always use ~/.config/riggs/
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("riggs")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("riggs")
    }
}

/// Detect the host's IANA zone, `UTC` when the platform won't say.
pub fn local_zone() -> String {
    match iana_time_zone::get_timezone() {
        Ok(zone) if !zone.is_empty() => zone,
        Ok(_) => "UTC".to_string(),
        Err(e) => {
            tracing::warn!("could not detect local timezone ({}), using UTC", e);
            "UTC".to_string()
        }
    }
}
