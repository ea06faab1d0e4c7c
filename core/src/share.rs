//! Platform share and clipboard integrations.
//!
//! RULE: Integration failures never reach engine state. Every outcome of
//! a share attempt collapses into one notification text.

use crate::{
    codec::{self, SessionResult},
    error::ShareError,
};

pub const SHARE_TITLE: &str = "Fictional Fate";

pub const MSG_SHARED: &str = "Shared. Your timeline just shook.";
pub const MSG_LINK_COPIED: &str = "Link copied. Drop it in the group chat.";
pub const MSG_COPY_FAILED: &str = "Copy failed. Try again.";
pub const MSG_SHARE_AND_COPY_FAILED: &str = "Sharing failed. Copy failed too.";
pub const MSG_DIRECT_COPY: &str = "Link copied. Now be insufferable.";

/// A platform share sheet plus clipboard.
pub trait ShareTarget {
    /// Hand the link to the platform share sheet.
    /// `ShareError::Unavailable` means there is no share sheet at all.
    fn share(&mut self, title: &str, text: &str, url: &str) -> Result<(), ShareError>;

    fn copy(&mut self, text: &str) -> Result<(), ShareError>;
}

/// Try the share sheet, falling back to the clipboard. Returns the
/// notification text to show.
pub fn share_result(
    target: &mut dyn ShareTarget,
    result: &SessionResult,
    base_url: &str,
) -> &'static str {
    let link = codec::share_link(base_url, result);
    let text = codec::share_message(result, &link);

    match target.share(SHARE_TITLE, &text, &link) {
        Ok(()) => MSG_SHARED,
        Err(ShareError::Unavailable) => match target.copy(&link) {
            Ok(()) => MSG_LINK_COPIED,
            Err(e) => {
                log::debug!("copy after missing share sheet failed: {e}");
                MSG_COPY_FAILED
            }
        },
        Err(share_err) => match target.copy(&link) {
            Ok(()) => {
                log::debug!("share failed, link copied instead: {share_err}");
                MSG_LINK_COPIED
            }
            Err(copy_err) => {
                log::debug!("share failed ({share_err}) and copy failed ({copy_err})");
                MSG_SHARE_AND_COPY_FAILED
            }
        },
    }
}

/// Copy the link straight to the clipboard.
pub fn copy_link(
    target: &mut dyn ShareTarget,
    result: &SessionResult,
    base_url: &str,
) -> &'static str {
    let link = codec::share_link(base_url, result);
    match target.copy(&link) {
        Ok(()) => MSG_DIRECT_COPY,
        Err(e) => {
            log::debug!("copy failed: {e}");
            MSG_COPY_FAILED
        }
    }
}
