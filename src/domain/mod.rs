/// Post aggregate mutations
///
/// Pure, synchronous operations over a loaded `Post` value. All changes to
/// the embedded likes/comments collections go through these methods; callers
/// are responsible for persisting the mutated post afterwards.
///
/// Like/unlike is deliberately not a toggle: liking twice is rejected with
/// `AlreadyLiked`, unliking a post the user never liked is rejected with
/// `NotLiked`.
use crate::error::{AppError, Result};
use crate::models::{Comment, Like, Post};
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

impl Post {
    /// Record a like by `user_id`, newest first.
    pub fn add_like(&mut self, user_id: Uuid) -> Result<()> {
        if self.likes.iter().any(|like| like.user_id == user_id) {
            return Err(AppError::AlreadyLiked);
        }

        self.likes.insert(
            0,
            Like {
                id: Uuid::new_v4(),
                user_id,
            },
        );
        Ok(())
    }

    /// Remove the like placed by `user_id`.
    ///
    /// Always removes the lowest-index match so behavior stays deterministic
    /// even if duplicate user ids ever slipped into the sequence.
    pub fn remove_like(&mut self, user_id: Uuid) -> Result<()> {
        let index = self
            .likes
            .iter()
            .position(|like| like.user_id == user_id)
            .ok_or(AppError::NotLiked)?;

        self.likes.remove(index);
        Ok(())
    }

    /// Prepend a comment authored by `user_id`.
    pub fn add_comment(
        &mut self,
        user_id: Uuid,
        text: String,
        name: String,
        avatar: Option<String>,
    ) -> Result<()> {
        if text.trim().is_empty() {
            let mut fields = HashMap::new();
            fields.insert("text".to_string(), "Text field is required".to_string());
            return Err(AppError::Validation(fields));
        }

        self.comments.insert(
            0,
            Comment {
                id: Uuid::new_v4(),
                user_id,
                text,
                name,
                avatar,
                date: Utc::now(),
            },
        );
        Ok(())
    }

    /// Remove the comment with `comment_id`.
    pub fn remove_comment(&mut self, comment_id: Uuid) -> Result<()> {
        let index = self
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
            .ok_or(AppError::CommentNotFound)?;

        self.comments.remove(index);
        Ok(())
    }

    /// Reject callers other than the post owner. Only deletion is
    /// owner-restricted; likes and comments are open to everyone.
    pub fn ensure_owner(&self, caller_id: Uuid) -> Result<()> {
        if self.user_id != caller_id {
            return Err(AppError::NotAuthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(owner: Uuid) -> Post {
        Post::new(
            owner,
            "A post that is long enough".to_string(),
            "Owner".to_string(),
            None,
        )
    }

    #[test]
    fn test_add_like_prepends() {
        let mut post = sample_post(Uuid::new_v4());
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        post.add_like(first).unwrap();
        post.add_like(second).unwrap();

        assert_eq!(post.likes.len(), 2);
        assert_eq!(post.likes[0].user_id, second);
        assert_eq!(post.likes[1].user_id, first);
    }

    #[test]
    fn test_double_like_rejected() {
        let mut post = sample_post(Uuid::new_v4());
        let user = Uuid::new_v4();

        post.add_like(user).unwrap();
        let err = post.add_like(user).unwrap_err();

        assert!(matches!(err, AppError::AlreadyLiked));
        assert_eq!(post.likes.len(), 1);
    }

    #[test]
    fn test_like_unlike_round_trip() {
        let mut post = sample_post(Uuid::new_v4());
        let user = Uuid::new_v4();
        let original = post.likes.clone();

        post.add_like(user).unwrap();
        post.remove_like(user).unwrap();

        assert_eq!(post.likes, original);
    }

    #[test]
    fn test_unlike_never_liked_rejected() {
        let mut post = sample_post(Uuid::new_v4());
        let bystander = Uuid::new_v4();
        post.add_like(Uuid::new_v4()).unwrap();
        let before = post.likes.clone();

        let err = post.remove_like(bystander).unwrap_err();

        assert!(matches!(err, AppError::NotLiked));
        assert_eq!(post.likes, before);
    }

    #[test]
    fn test_remove_like_takes_first_match() {
        let mut post = sample_post(Uuid::new_v4());
        let user = Uuid::new_v4();
        // Force the hypothetical duplicate the invariant normally rules out.
        post.likes.push(Like {
            id: Uuid::new_v4(),
            user_id: user,
        });
        post.likes.push(Like {
            id: Uuid::new_v4(),
            user_id: user,
        });
        let second_id = post.likes[1].id;

        post.remove_like(user).unwrap();

        assert_eq!(post.likes.len(), 1);
        assert_eq!(post.likes[0].id, second_id);
    }

    #[test]
    fn test_comment_round_trip() {
        let mut post = sample_post(Uuid::new_v4());
        let original = post.comments.clone();

        post.add_comment(
            Uuid::new_v4(),
            "nice post".to_string(),
            "Commenter".to_string(),
            None,
        )
        .unwrap();
        let comment_id = post.comments[0].id;
        post.remove_comment(comment_id).unwrap();

        assert_eq!(post.comments, original);
    }

    #[test]
    fn test_comments_newest_first() {
        let mut post = sample_post(Uuid::new_v4());
        let author = Uuid::new_v4();

        post.add_comment(author, "first".to_string(), "A".to_string(), None)
            .unwrap();
        post.add_comment(author, "second".to_string(), "A".to_string(), None)
            .unwrap();

        assert_eq!(post.comments[0].text, "second");
        assert_eq!(post.comments[1].text, "first");
    }

    #[test]
    fn test_empty_comment_rejected() {
        let mut post = sample_post(Uuid::new_v4());

        let err = post
            .add_comment(Uuid::new_v4(), "   ".to_string(), "A".to_string(), None)
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(post.comments.is_empty());
    }

    #[test]
    fn test_remove_unknown_comment_rejected() {
        let mut post = sample_post(Uuid::new_v4());
        post.add_comment(Uuid::new_v4(), "hello".to_string(), "A".to_string(), None)
            .unwrap();
        let before = post.comments.clone();

        let err = post.remove_comment(Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, AppError::CommentNotFound));
        assert_eq!(post.comments, before);
    }

    #[test]
    fn test_ensure_owner() {
        let owner = Uuid::new_v4();
        let post = sample_post(owner);

        assert!(post.ensure_owner(owner).is_ok());
        assert!(matches!(
            post.ensure_owner(Uuid::new_v4()),
            Err(AppError::NotAuthorized)
        ));
    }
}
