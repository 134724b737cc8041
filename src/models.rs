//! Data shapes exchanged with the feed backend.
//!
//! Plain serde structs mirroring the backend's JSON. The only logic
//! here is `Post::safe_content`, which routes user-authored markup
//! through the sanitizer before it reaches the display layer.

use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize_html;

/// A feed post, possibly a repost of or a reply to another post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    /// User-authored HTML fragment. Untrusted; render through
    /// `safe_content()`, never directly.
    pub content: String,
    pub created_at: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
    pub account_username: String,
    pub account_display_name: String,
    pub account_avatar: String,
    pub is_owner: bool,
    pub favorited: bool,
    pub favorite_count: i64,
    pub reposted: bool,
    pub repost_count: i64,
    pub reply_count: i64,
    pub is_repost: bool,
    #[serde(default)]
    pub original_post: Option<Box<Post>>,
    #[serde(default)]
    pub reply_to: Option<Box<Post>>,
}

impl Post {
    /// The post body reduced to the safe-to-render markup subset.
    pub fn safe_content(&self) -> String {
        sanitize_html(&self.content)
    }
}

/// Profile header data for the `@username` view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub display_name: String,
    pub followers: i64,
    pub following: i64,
    pub is_owner: bool,
    pub is_following: bool,
    pub username: String,
    pub profile_picture: String,
    pub banner_picture: String,
}

/// A notification row (favorite, repost, reply, follow).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub action: String,
    pub action_account: String,
    pub action_account_displayname: String,
    pub read: bool,
    pub created_at: String,
    pub post_id: Option<i64>,
    pub notification_id: i64,
}
