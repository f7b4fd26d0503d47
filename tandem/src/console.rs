//! Terminal interaction.

use std::io::{self, Read};

/// Blocks until a single key is pressed on standard input.
///
/// When stdin is a terminal, line buffering and echo are switched off
/// for the duration of the read, so any key returns immediately rather
/// than waiting for Enter; the previous terminal mode is restored
/// afterwards. When stdin is not a terminal, one byte is read, and end
/// of input counts as the key.
pub fn wait_for_key() -> io::Result<()> {
    #[cfg(unix)]
    let _raw = RawMode::enable(libc::STDIN_FILENO)?;

    let mut key = [0u8; 1];
    let mut stdin = io::stdin().lock();

    loop {
        match stdin.read(&mut key) {
            Ok(_) => return Ok(()),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Non-canonical, no-echo terminal mode; restores the saved mode on drop.
#[cfg(unix)]
struct RawMode {
    fd: libc::c_int,
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Returns `None` if `fd` is not a terminal.
    fn enable(fd: libc::c_int) -> io::Result<Option<Self>> {
        if unsafe { libc::isatty(fd) } != 1 {
            return Ok(None);
        }

        let mut saved = std::mem::MaybeUninit::<libc::termios>::uninit();
        if unsafe { libc::tcgetattr(fd, saved.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: initialised by the successful `tcgetattr` above.
        let saved = unsafe { saved.assume_init() };

        let mut raw = saved;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Some(Self { fd, saved }))
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &self.saved) } != 0 {
            tracing::warn!(
                error = %io::Error::last_os_error(),
                "failed to restore terminal mode"
            );
        }
    }
}
