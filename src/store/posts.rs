//! Post store: the post table plus its category and author indexes.
//!
//! Every index holds post ids that point back into the single authoritative
//! table. Inserting under an id that is already taken replaces the old post
//! and drops its index entries. All reads hand out owned snapshots; mutation
//! goes through the store so the indexes stay consistent.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::debug;

use super::models::{Category, Comment, NewPost, Post, Vote, VoteValue};
use super::scoring;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    #[error("wrong category: {0}")]
    InvalidCategory(String),
    #[error("post not found")]
    PostNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("vote not found")]
    VoteNotFound,
    #[error("access denied")]
    AccessDenied,
    #[error("user has no posts: {0}")]
    UserHasNoPosts(String),
}

#[derive(Debug, Default)]
struct PostTables {
    posts: HashMap<String, Post>,
    by_category: HashMap<Category, Vec<String>>,
    by_author: HashMap<String, Vec<String>>,
}

impl PostTables {
    fn insert(&mut self, new_post: NewPost) -> Result<Post, PostError> {
        let category = Category::parse(&new_post.category)
            .ok_or_else(|| PostError::InvalidCategory(new_post.category.clone()))?;

        let mut post = Post {
            id: new_post.id,
            title: new_post.title,
            category,
            content: new_post.content,
            author: new_post.author,
            created: new_post.created,
            views: 0,
            votes: Vec::new(),
            comments: Vec::new(),
            score: 0,
            upvote_percentage: 0,
        };

        // Authors implicitly upvote their own post.
        post.votes.push(Vote {
            user_id: post.author.id.clone(),
            value: VoteValue::Up,
        });
        recompute(&mut post);

        if let Some(old) = self.posts.remove(&post.id) {
            self.unindex(&old);
        }
        self.by_category
            .entry(category)
            .or_default()
            .push(post.id.clone());
        self.posts.insert(post.id.clone(), post.clone());

        Ok(post)
    }

    fn index_for_author(&mut self, username: &str, post_id: &str) {
        self.by_author
            .entry(username.to_string())
            .or_default()
            .push(post_id.to_string());
    }

    fn unindex(&mut self, post: &Post) {
        if let Some(ids) = self.by_category.get_mut(&post.category) {
            ids.retain(|id| *id != post.id);
        }
        if let Some(ids) = self.by_author.get_mut(&post.author.username) {
            ids.retain(|id| *id != post.id);
        }
    }

    fn post_mut(&mut self, post_id: &str) -> Result<&mut Post, PostError> {
        self.posts.get_mut(post_id).ok_or(PostError::PostNotFound)
    }

    fn resolve(&self, ids: &[String]) -> Vec<Post> {
        ids.iter()
            .filter_map(|id| self.posts.get(id))
            .cloned()
            .collect()
    }
}

fn recompute(post: &mut Post) {
    let tally = scoring::tally(&post.votes);
    post.score = tally.score;
    post.upvote_percentage = tally.upvote_percentage;
}

/// Thread-safe in-memory post repository.
#[derive(Debug, Default)]
pub struct PostStore {
    inner: RwLock<PostTables>,
}

impl PostStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, PostTables> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PostTables> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a post in the global table and its category index.
    ///
    /// The author's upvote is recorded before the post becomes visible. No
    /// duplicate-id check is made; callers must supply a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::InvalidCategory`] if the category is unknown; in
    /// that case nothing is stored.
    pub fn create_post(&self, new_post: NewPost) -> Result<Post, PostError> {
        let post = self.write().insert(new_post)?;
        debug!(post_id = %post.id, category = post.category.as_str(), "Post created");
        Ok(post)
    }

    /// Append a post id to the author's ordered post list.
    pub fn index_post_for_author(&self, username: &str, post_id: &str) {
        self.write().index_for_author(username, post_id);
        debug!(%username, %post_id, "Post indexed for author");
    }

    /// Create a post and index it under its author in one critical section.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::InvalidCategory`] if the category is unknown.
    pub fn publish(&self, new_post: NewPost) -> Result<Post, PostError> {
        let post = {
            let mut tables = self.write();
            let post = tables.insert(new_post)?;
            tables.index_for_author(&post.author.username, &post.id);
            post
        };
        debug!(
            post_id = %post.id,
            author = %post.author.username,
            category = post.category.as_str(),
            "Post published"
        );
        Ok(post)
    }

    /// # Errors
    ///
    /// Returns [`PostError::PostNotFound`] if no post has this id.
    pub fn get_post(&self, post_id: &str) -> Result<Post, PostError> {
        self.read()
            .posts
            .get(post_id)
            .cloned()
            .ok_or(PostError::PostNotFound)
    }

    /// Increment the view counter and return the updated post.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::PostNotFound`] if no post has this id.
    pub fn record_view(&self, post_id: &str) -> Result<Post, PostError> {
        let mut tables = self.write();
        let post = tables.post_mut(post_id)?;
        post.views += 1;
        Ok(post.clone())
    }

    /// Every stored post, in no particular order.
    #[must_use]
    pub fn list_all_posts(&self) -> Vec<Post> {
        self.read().posts.values().cloned().collect()
    }

    /// Posts of one category, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::InvalidCategory`] if the category is unknown.
    pub fn list_posts_by_category(&self, category: &str) -> Result<Vec<Post>, PostError> {
        let category = Category::parse(category)
            .ok_or_else(|| PostError::InvalidCategory(category.to_string()))?;

        let tables = self.read();
        Ok(tables
            .by_category
            .get(&category)
            .map(|ids| tables.resolve(ids))
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`PostError::PostNotFound`] if no post has this id.
    pub fn add_comment(&self, post_id: &str, comment: Comment) -> Result<Post, PostError> {
        let mut tables = self.write();
        let post = tables.post_mut(post_id)?;
        debug!(%post_id, comment_id = %comment.id, "Comment added");
        post.comments.push(comment);
        Ok(post.clone())
    }

    /// Remove a comment, keeping the remaining comments in order.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::PostNotFound`] or [`PostError::CommentNotFound`]
    /// if either is missing, and [`PostError::AccessDenied`] if the comment
    /// exists but was written by someone else.
    pub fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        requester_id: &str,
    ) -> Result<Post, PostError> {
        let mut tables = self.write();
        let post = tables.post_mut(post_id)?;

        let index = post
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(PostError::CommentNotFound)?;

        if post.comments[index].author.id != requester_id {
            return Err(PostError::AccessDenied);
        }

        post.comments.remove(index);
        debug!(%post_id, %comment_id, "Comment deleted");
        Ok(post.clone())
    }

    /// Record `user_id`'s vote, replacing any earlier vote by the same user,
    /// then recompute score and percentage.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::PostNotFound`] if the post was deleted.
    pub fn apply_vote(
        &self,
        post_id: &str,
        user_id: &str,
        value: VoteValue,
    ) -> Result<Post, PostError> {
        let mut tables = self.write();
        let post = tables.post_mut(post_id)?;

        match post.votes.iter_mut().find(|v| v.user_id == user_id) {
            Some(existing) => existing.value = value,
            None => post.votes.push(Vote {
                user_id: user_id.to_string(),
                value,
            }),
        }
        recompute(post);

        debug!(%post_id, %user_id, vote = value.as_i64(), score = post.score, "Vote applied");
        Ok(post.clone())
    }

    /// Remove `user_id`'s vote, keeping the remaining votes in order.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::PostNotFound`] if the post is missing and
    /// [`PostError::VoteNotFound`] if the user has not voted on it.
    pub fn clear_vote(&self, post_id: &str, user_id: &str) -> Result<Post, PostError> {
        let mut tables = self.write();
        let post = tables.post_mut(post_id)?;

        let index = post
            .votes
            .iter()
            .position(|v| v.user_id == user_id)
            .ok_or(PostError::VoteNotFound)?;

        post.votes.remove(index);
        recompute(post);

        debug!(%post_id, %user_id, score = post.score, "Vote cleared");
        Ok(post.clone())
    }

    /// Remove a post from the global table, its category and the author list.
    ///
    /// The author list is the stored author's; `author_username` is only
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::PostNotFound`] if the post is missing and
    /// [`PostError::AccessDenied`] if `requester_id` is not the author.
    pub fn delete_post(
        &self,
        post_id: &str,
        author_username: &str,
        requester_id: &str,
    ) -> Result<(), PostError> {
        let mut tables = self.write();

        let post = tables.posts.get(post_id).ok_or(PostError::PostNotFound)?;
        if post.author.id != requester_id {
            return Err(PostError::AccessDenied);
        }

        if let Some(post) = tables.posts.remove(post_id) {
            tables.unindex(&post);
            if post.author.username != author_username {
                debug!(
                    %post_id,
                    stored = %post.author.username,
                    given = %author_username,
                    "Author name mismatch on delete"
                );
            }
        }

        debug!(%post_id, author = %author_username, "Post deleted");
        Ok(())
    }

    /// The author's posts in the order they were indexed.
    ///
    /// An author whose posts were all deleted gets an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::UserHasNoPosts`] if the author never posted.
    pub fn list_posts_by_author(&self, username: &str) -> Result<Vec<Post>, PostError> {
        let tables = self.read();
        tables
            .by_author
            .get(username)
            .map(|ids| tables.resolve(ids))
            .ok_or_else(|| PostError::UserHasNoPosts(username.to_string()))
    }
}
