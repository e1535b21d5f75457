//! Signalling a child together with everything it spawned.
//!
//! yt-dlp runs ffmpeg as its own child, so killing only the direct child
//! leaves the transcode writing into the output directory. The tool is
//! started as leader of a fresh process group and the whole group is killed.

use std::time::Duration;
use tokio::time::Instant;

const GONE_POLL: Duration = Duration::from_millis(20);
const GONE_LIMIT: Duration = Duration::from_secs(2);

fn pid(pgid: u32) -> Option<libc::pid_t> {
    libc::pid_t::try_from(pgid).ok().filter(|p| *p > 0)
}

/// Sends SIGKILL to every process in group `pgid`.
pub(super) fn kill(pgid: u32) {
    let Some(pgid) = pid(pgid) else {
        return;
    };
    let r = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if r != 0 {
        let err = std::io::Error::last_os_error();
        tracing::debug!(pgid, "killpg failed: {}", err);
    }
}

fn exists(pgid: libc::pid_t) -> bool {
    let r = unsafe { libc::killpg(pgid, 0) };
    r == 0 || std::io::Error::last_os_error().raw_os_error() != Some(libc::ESRCH)
}

/// Waits until no member of group `pgid` is left, up to a short limit.
///
/// Members that exited but were not reaped yet still count, so this may run
/// into the limit when nothing reaps orphans; they can no longer write then.
pub(super) async fn wait_gone(pgid: u32) -> bool {
    let Some(pgid) = pid(pgid) else {
        return true;
    };
    let deadline = Instant::now() + GONE_LIMIT;
    while exists(pgid) {
        if Instant::now() >= deadline {
            tracing::warn!(pgid, "process group still present after kill");
            return false;
        }
        tokio::time::sleep(GONE_POLL).await;
    }
    true
}
