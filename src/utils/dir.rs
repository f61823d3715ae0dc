use std::{env, io, path::PathBuf};

use anyhow::Result;

/// Directory for framesheet's own state (session, logs). Created on demand.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path =
                PathBuf::from(env::var("APPDATA").expect("APPDATA should be present on Windows"));
            path.push("framesheet");
            path
        }
        #[cfg(target_os = "linux")]
        {
            let mut path = env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/state");
                        path
                    })
                })
                .expect("Couldn't find neither XDG_STATE_HOME nor HOME");
            path.push("framesheet");
            path
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

/// Directory holding Watson's files, notably `frames`. Resolution order is
/// the `--dir` flag, then `WATSON_DIR`, then the platform default. The
/// directory belongs to Watson, so it is never created here.
pub fn resolve_watson_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Ok(dir) = env::var("WATSON_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(windows)]
    {
        let mut path =
            PathBuf::from(env::var("APPDATA").expect("APPDATA should be present on Windows"));
        path.push("watson");
        path
    }
    #[cfg(target_os = "linux")]
    {
        let mut path = env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| {
                env::var("HOME").map(|home| {
                    let mut path = PathBuf::from(home);
                    path.push(".config");
                    path
                })
            })
            .expect("Couldn't find neither XDG_CONFIG_HOME nor HOME");
        path.push("watson");
        path
    }
}
