use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Forum section a post belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Music,
    Funny,
    Videos,
    Programming,
    News,
    Fashion,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Music,
        Self::Funny,
        Self::Videos,
        Self::Programming,
        Self::News,
        Self::Fashion,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Funny => "funny",
            Self::Videos => "videos",
            Self::Programming => "programming",
            Self::News => "news",
            Self::Fashion => "fashion",
        }
    }

    /// Case-sensitive parse; categories are always lowercase on the wire.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "music" => Some(Self::Music),
            "funny" => Some(Self::Funny),
            "videos" => Some(Self::Videos),
            "programming" => Some(Self::Programming),
            "news" => Some(Self::News),
            "fashion" => Some(Self::Fashion),
            _ => None,
        }
    }
}

/// Username and user id of whoever wrote a post or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    pub id: String,
}

/// Direction of a vote. Serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl Serialize for VoteValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

/// A single user's vote on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    #[serde(rename = "user")]
    pub user_id: String,
    #[serde(rename = "vote")]
    pub value: VoteValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: Author,
    pub created: DateTime<Utc>,
}

/// Body of a post: either free text or a link, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostContent {
    Text { text: String },
    Link { url: String },
}

/// A post together with its votes, comments and derived score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(flatten)]
    pub content: PostContent,
    pub author: Author,
    pub created: DateTime<Utc>,
    pub views: u64,
    pub votes: Vec<Vote>,
    pub comments: Vec<Comment>,
    pub score: i64,
    pub upvote_percentage: i64,
}

/// Input for [`PostStore::create_post`](super::PostStore::create_post).
///
/// `category` is carried as the raw string so the store can reject unknown
/// sections itself.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: String,
    pub title: String,
    pub category: String,
    pub content: PostContent,
    pub author: Author,
    pub created: DateTime<Utc>,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// A logged-in client, keyed by the opaque token stored in its cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub user_id: String,
}
