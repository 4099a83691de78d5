use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Copy `text` to the system clipboard via the platform's clipboard tool.
pub fn set(text: &str) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = Command::new("pbcopy");
    #[cfg(target_os = "linux")]
    let mut cmd = {
        let mut c = Command::new("xclip");
        c.args(["-selection", "clipboard"]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    return Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no clipboard tool for this platform",
    ));

    #[cfg(any(target_os = "macos", target_os = "linux"))]
    {
        let mut child = cmd.stdin(Stdio::piped()).spawn()?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("clipboard tool exited with {}", status)))
        }
    }
}
