//! Concurrency tests for the in-memory stores.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use forum_backend::store::{
    Author, NewPost, PostContent, PostError, PostStore, SessionStore, VoteValue,
};

fn new_post(id: &str, author: &str) -> NewPost {
    NewPost {
        id: id.to_string(),
        title: "concurrent".to_string(),
        category: "programming".to_string(),
        content: PostContent::Text {
            text: "body".to_string(),
        },
        author: Author {
            username: author.to_string(),
            id: format!("{author}-id"),
        },
        created: Utc::now(),
    }
}

#[test]
fn test_concurrent_up_and_down_votes_resolve_deterministically() {
    for _ in 0..50 {
        let store = PostStore::new();
        store.publish(new_post("p1", "alice")).unwrap();

        thread::scope(|s| {
            s.spawn(|| store.apply_vote("p1", "bob-id", VoteValue::Up).unwrap());
            s.spawn(|| store.apply_vote("p1", "carol-id", VoteValue::Down).unwrap());
        });

        let post = store.get_post("p1").unwrap();
        assert_eq!(post.votes.len(), 3);
        assert_eq!(post.score, 1);
        assert_eq!(post.upvote_percentage, 200);
    }
}

#[test]
fn test_concurrent_views_are_not_lost() {
    let store = Arc::new(PostStore::new());
    store.publish(new_post("p1", "alice")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..250 {
                    store.record_view("p1").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get_post("p1").unwrap().views, 2000);
}

#[test]
fn test_concurrent_voters_one_vote_each() {
    let store = Arc::new(PostStore::new());
    store.publish(new_post("p1", "alice")).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let user = format!("voter{i}");
                let value = if i % 2 == 0 {
                    VoteValue::Up
                } else {
                    VoteValue::Down
                };
                // Flip a few times, finishing on `value`.
                for _ in 0..5 {
                    store.apply_vote("p1", &user, VoteValue::Up).unwrap();
                    store.apply_vote("p1", &user, VoteValue::Down).unwrap();
                }
                store.apply_vote("p1", &user, value).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let post = store.get_post("p1").unwrap();
    // Author plus sixteen voters, eight of each sign.
    assert_eq!(post.votes.len(), 17);
    assert_eq!(post.score, 1);
    assert_eq!(post.upvote_percentage, 113);
}

#[test]
fn test_concurrent_publish_keeps_indexes_consistent() {
    let store = Arc::new(PostStore::new());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    store
                        .publish(new_post(&format!("p{t}-{i}"), &format!("author{t}")))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.list_all_posts().len(), 200);
    assert_eq!(store.list_posts_by_category("programming").unwrap().len(), 200);
    for t in 0..8 {
        let mine = store.list_posts_by_author(&format!("author{t}")).unwrap();
        let ids: Vec<_> = mine.iter().map(|p| p.id.clone()).collect();
        let expected: Vec<_> = (0..25).map(|i| format!("p{t}-{i}")).collect();
        assert_eq!(ids, expected);
    }
}

#[test]
fn test_delete_races_with_votes() {
    let store = Arc::new(PostStore::new());
    store.publish(new_post("p1", "alice")).unwrap();

    let voter = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..100 {
                match store.apply_vote("p1", "bob-id", VoteValue::Up) {
                    Ok(post) => assert_eq!(post.votes.len(), 2),
                    Err(e) => assert_eq!(e, PostError::PostNotFound),
                }
            }
        })
    };
    store.delete_post("p1", "alice", "alice-id").unwrap();
    voter.join().unwrap();

    assert_eq!(store.get_post("p1"), Err(PostError::PostNotFound));
    assert!(store.list_posts_by_author("alice").unwrap().is_empty());
    assert!(store
        .list_posts_by_category("programming")
        .unwrap()
        .is_empty());
}

#[test]
fn test_concurrent_sessions() {
    let store = Arc::new(SessionStore::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let session = store.create(&format!("user{i}"), &format!("id{i}")).unwrap();
                assert_eq!(store.lookup(&session.id).unwrap().username, format!("user{i}"));
                session.id
            })
        })
        .collect();
    let tokens: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for token in &tokens {
        assert!(store.lookup(token).is_ok());
        store.destroy(token);
        assert!(store.lookup(token).is_err());
    }
}
