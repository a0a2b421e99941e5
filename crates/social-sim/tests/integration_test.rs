use pretty_assertions::assert_eq;
use social_sim::clients::EngineClient;
use social_sim::comment_actor::MAX_REPLY_DEPTH;
use social_sim::config::BackendConfig;
use social_sim::engine::{EDIT_TIMEOUT, SEARCH_TIMEOUT};
use social_sim::error::DomainError;
use social_sim::lifecycle::Backend;
use social_sim::model::{Removed, TargetKind, VoteChange};
use parking_lot::RwLock;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::time::Instant;

const SETTLE: Duration = Duration::from_secs(2);

fn backend(engines: usize) -> Backend {
    let config = BackendConfig {
        pool_size: 3,
        request_timeout_ms: 2_000,
    };
    Backend::start(config, engines).unwrap()
}

/// Karma arrives as fire-and-forget deltas, so poll until it settles.
async fn karma_settles(client: &EngineClient, user: &str, expected: i64) -> i64 {
    let deadline = Instant::now() + SETTLE;
    loop {
        let karma = client.karma(user).await.unwrap();
        if karma == expected || Instant::now() >= deadline {
            return karma;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Holds `store`'s write lock on a plain thread for `hold`. Returns once the
/// lock is taken.
fn stall<T: Send + Sync + 'static>(store: Arc<RwLock<T>>, hold: Duration) -> JoinHandle<()> {
    let (taken, wait) = mpsc::channel();
    let handle = thread::spawn(move || {
        let _guard = store.write();
        let _ = taken.send(());
        thread::sleep(hold);
    });
    let _ = wait.recv();
    handle
}

async fn register_all(client: &EngineClient, users: &[&str]) {
    for user in users {
        client.register(user, "pw").await.unwrap();
    }
}

// --- Users ---

#[tokio::test]
async fn test_register_twice_conflicts() {
    let backend = backend(1);
    let client = backend.client(0);

    client.register("alice", "pw").await.unwrap();
    assert_eq!(
        client.register("alice", "other").await,
        Err(DomainError::conflict("Username already exists"))
    );

    backend.shutdown().await;
}

#[tokio::test]
async fn test_login_token_validates_to_username() {
    let backend = backend(1);
    let client = backend.client(0);
    client.register("alice", "secret").await.unwrap();

    let token = client.login("alice", "secret").await.unwrap();
    assert_eq!(client.validate_token(&token).await, Ok("alice".to_string()));

    assert_eq!(
        client.login("alice", "wrong").await,
        Err(DomainError::unauthorized("Invalid credentials"))
    );
    assert!(client.validate_token("session-token-mallory").await.is_err());

    backend.shutdown().await;
}

#[tokio::test]
async fn test_entities_are_shared_across_engines() {
    let backend = backend(2);
    let first = backend.client(0);
    let second = backend.client(1);

    first.register("alice", "pw").await.unwrap();
    first.create_community("rust", "Rustaceans", "alice").await.unwrap();

    assert!(second.login("alice", "pw").await.is_ok());
    assert_eq!(second.communities().await, Ok(vec!["rust".to_string()]));

    backend.shutdown().await;
}

// --- Communities ---

#[tokio::test]
async fn test_join_leave_round_trip_keeps_creator() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice", "bob"]).await;

    let created = client
        .create_community("rust", "Rustaceans", "alice")
        .await
        .unwrap();
    let pinned = client.pinned(created.served_by);
    let before = pinned.members("rust").await.unwrap();
    assert_eq!(before, vec!["alice".to_string()]);

    pinned.join_community("rust", "bob").await.unwrap();
    assert_eq!(
        pinned.join_community("rust", "bob").await,
        Err(DomainError::conflict("User is already a member"))
    );
    assert_eq!(
        client.members("rust").await.unwrap(),
        vec!["alice".to_string(), "bob".to_string()]
    );
    pinned.leave_community("rust", "bob").await.unwrap();
    assert_eq!(pinned.members("rust").await.unwrap(), before);

    assert!(matches!(
        client.leave_community("rust", "alice").await,
        Err(DomainError::Unauthorized(_))
    ));
    assert!(matches!(
        client.leave_community("rust", "bob").await,
        Err(DomainError::NotFound(_))
    ));
    assert_eq!(
        client.join_community("golang", "bob").await,
        Err(DomainError::not_found("Community not found"))
    );

    backend.shutdown().await;
}

#[tokio::test]
async fn test_unknown_pin_is_unavailable() {
    let backend = backend(1);
    let client = backend.client(0);
    let stranger = backend.engines()[0].id();

    assert_eq!(
        client.pinned(stranger).communities().await,
        Err(DomainError::Unavailable("Actor unavailable".to_string()))
    );

    backend.shutdown().await;
}

#[tokio::test]
async fn test_community_delete_removes_posts_and_comments() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice", "bob"]).await;
    client.create_community("rust", "", "alice").await.unwrap();
    client.create_community("go", "", "bob").await.unwrap();

    let mut post_ids = Vec::new();
    for title in ["one", "two", "three"] {
        post_ids.push(client.create_post("rust", title, "body", "alice").await.unwrap().id);
    }
    let survivor = client.create_post("go", "elsewhere", "body", "bob").await.unwrap().id;
    let top = client
        .create_comment(&post_ids[0], None, "top", "bob")
        .await
        .unwrap();
    client
        .create_comment(&post_ids[0], Some(&top.id), "reply", "alice")
        .await
        .unwrap();
    client
        .create_comment(&post_ids[2], None, "another", "bob")
        .await
        .unwrap();
    client
        .create_comment(&survivor, None, "untouched", "alice")
        .await
        .unwrap();

    assert!(matches!(
        client.delete_community("rust", "bob").await,
        Err(DomainError::Unauthorized(_))
    ));
    assert_eq!(client.posts("rust").await.unwrap().len(), 3);

    let removed = client.delete_community("rust", "alice").await.unwrap();
    assert_eq!(removed, Removed { posts: 3, comments: 3 });

    assert_eq!(client.communities().await, Ok(vec!["go".to_string()]));
    assert!(client.posts("rust").await.unwrap().is_empty());
    for id in &post_ids {
        assert!(client.comments(id).await.unwrap().is_empty());
        assert_eq!(
            client.post(id).await,
            Err(DomainError::not_found("Post not found"))
        );
    }
    assert_eq!(client.comments(&survivor).await.unwrap().len(), 1);

    // Deleted names stay retired.
    assert_eq!(
        client.create_community("rust", "again", "bob").await,
        Err(DomainError::conflict("Community already exists"))
    );
    assert!(client.create_post("rust", "late", "body", "bob").await.is_err());

    backend.shutdown().await;
}

// --- Engine relays ---

// Stalled actors block their worker thread on the store lock.
#[tokio::test(flavor = "multi_thread", worker_threads = 6)]
async fn test_stalled_relays_report_fixed_timeouts() {
    let config = BackendConfig {
        pool_size: 2,
        request_timeout_ms: 200,
    };
    let backend = Backend::start(config, 1).unwrap();
    let client = backend.client(0);
    let posts = stall(backend.stores().posts.clone(), Duration::from_secs(2));
    let comments = stall(backend.stores().comments.clone(), Duration::from_secs(2));

    assert_eq!(
        client.search("anything").await,
        Err(DomainError::Timeout(SEARCH_TIMEOUT.to_string()))
    );
    assert_eq!(
        client.edit_post("post-1", "alice", Some("title"), None).await,
        Err(DomainError::Timeout(EDIT_TIMEOUT.to_string()))
    );
    assert_eq!(
        client.edit_comment("comment-1", "alice", "content").await,
        Err(DomainError::Timeout(EDIT_TIMEOUT.to_string()))
    );

    posts.join().unwrap();
    comments.join().unwrap();
    backend.shutdown().await;
}

// --- Posts and comments ---

#[tokio::test]
async fn test_deleting_comment_removes_its_replies() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice", "bob"]).await;
    client.create_community("c1", "", "alice").await.unwrap();
    let p1 = client.create_post("c1", "p1", "body", "alice").await.unwrap().id;

    let x1 = client.create_comment(&p1, None, "x1", "alice").await.unwrap().id;
    client
        .create_comment(&p1, Some(&x1), "x2", "bob")
        .await
        .unwrap();

    let tree = client.comments(&p1).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].replies[0].content, "x2");

    assert!(matches!(
        client.delete_comment(&x1, "bob").await,
        Err(DomainError::Unauthorized(_))
    ));
    let removed = client.delete_comment(&x1, "alice").await.unwrap();
    assert_eq!(removed.comments, 2);
    assert!(client.comments(&p1).await.unwrap().is_empty());

    backend.shutdown().await;
}

#[tokio::test]
async fn test_deepest_reply_chain_round_trips() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice"]).await;
    client.create_community("c1", "", "alice").await.unwrap();
    let p1 = client.create_post("c1", "p1", "body", "alice").await.unwrap().id;

    let mut parent = client.create_comment(&p1, None, "root", "alice").await.unwrap().id;
    for depth in 1..MAX_REPLY_DEPTH {
        let reply = format!("reply {depth}");
        parent = client
            .create_comment(&p1, Some(&parent), &reply, "alice")
            .await
            .unwrap()
            .id;
    }
    assert_eq!(
        client.create_comment(&p1, Some(&parent), "too deep", "alice").await,
        Err(DomainError::invalid("Reply chain is too deep"))
    );

    let tree = client.comments(&p1).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].subtree_len(), MAX_REPLY_DEPTH);
    assert_eq!(client.search("p1").await.unwrap()[0].comments, tree);

    backend.shutdown().await;
}

#[tokio::test]
async fn test_post_delete_cascades_to_comments() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice", "bob"]).await;
    client.create_community("c1", "", "alice").await.unwrap();
    let p1 = client.create_post("c1", "p1", "body", "alice").await.unwrap().id;
    let x1 = client.create_comment(&p1, None, "x1", "bob").await.unwrap().id;
    client
        .create_comment(&p1, Some(&x1), "x2", "alice")
        .await
        .unwrap();

    assert_eq!(
        client.delete_post(&p1, "bob").await,
        Err(DomainError::unauthorized("Not authorized to delete this post"))
    );
    let removed = client.delete_post(&p1, "alice").await.unwrap();
    assert_eq!(removed, Removed { posts: 1, comments: 2 });

    assert!(client.posts("c1").await.unwrap().is_empty());
    assert_eq!(
        client.create_comment(&p1, None, "late", "bob").await,
        Err(DomainError::not_found("Post not found"))
    );

    backend.shutdown().await;
}

#[tokio::test]
async fn test_edit_checks_author_and_keeps_empty_fields() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice", "bob"]).await;
    client.create_community("c1", "", "alice").await.unwrap();
    let p1 = client.create_post("c1", "Title", "body", "alice").await.unwrap().id;

    assert_eq!(
        client.edit_post(&p1, "bob", Some("Hijacked"), None).await,
        Err(DomainError::unauthorized("Not authorized to edit this post"))
    );
    let edited = client
        .edit_post(&p1, "alice", Some(""), Some("new body"))
        .await
        .unwrap();
    assert_eq!(edited.title, "Title");
    assert_eq!(edited.content, "new body");

    let x1 = client.create_comment(&p1, None, "first", "bob").await.unwrap();
    let edited = client
        .pinned(x1.served_by)
        .edit_comment(&x1.id, "bob", "second")
        .await
        .unwrap();
    assert_eq!(edited.content, "second");
    assert!(client.edit_comment(&x1.id, "alice", "third").await.is_err());

    backend.shutdown().await;
}

#[tokio::test]
async fn test_search_attaches_comment_trees() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice", "bob"]).await;
    client.create_community("c1", "", "alice").await.unwrap();
    let hit = client
        .create_post("c1", "Async Rust", "tokio everywhere", "alice")
        .await
        .unwrap()
        .id;
    client
        .create_post("c1", "Gardening", "tomatoes", "bob")
        .await
        .unwrap();
    let x1 = client.create_comment(&hit, None, "nice", "bob").await.unwrap().id;
    client
        .create_comment(&hit, Some(&x1), "thanks", "alice")
        .await
        .unwrap();

    let matches = client.search("ASYNC").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, hit);
    assert_eq!(matches[0].comments[0].replies[0].content, "thanks");

    assert_eq!(client.search("to").await.unwrap().len(), 2);
    assert!(client.search("haskell").await.unwrap().is_empty());

    backend.shutdown().await;
}

// --- Votes and karma ---

#[tokio::test]
async fn test_up_down_up_nets_one() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice", "bob"]).await;
    client.create_community("c1", "", "alice").await.unwrap();
    let p1 = client.create_post("c1", "p1", "body", "alice").await.unwrap();
    let pinned = client.pinned(p1.served_by);

    let mut changes = Vec::new();
    for up in [true, false, true] {
        changes.push(pinned.vote(TargetKind::Post, &p1.id, "bob", up).await.unwrap().change);
    }
    assert_eq!(
        changes,
        vec![VoteChange::Cast, VoteChange::Flipped, VoteChange::Flipped]
    );
    assert_eq!(client.post(&p1.id).await.unwrap().votes.len(), 1);
    assert_eq!(karma_settles(&client, "alice", 1).await, 1);

    // Same polarity again withdraws.
    let outcome = pinned.vote(TargetKind::Post, &p1.id, "bob", true).await.unwrap();
    assert_eq!(outcome.change, VoteChange::Withdrawn);
    assert_eq!(karma_settles(&client, "alice", 0).await, 0);

    backend.shutdown().await;
}

#[tokio::test]
async fn test_karma_tracks_live_content() {
    let backend = backend(2);
    let client = backend.client(0);
    let other = backend.client(1);
    register_all(&client, &["alice", "bob", "carol"]).await;
    client.create_community("c1", "", "alice").await.unwrap();
    let p1 = client.create_post("c1", "p1", "body", "alice").await.unwrap().id;
    let x1 = client.create_comment(&p1, None, "x1", "alice").await.unwrap().id;

    client.vote(TargetKind::Post, &p1, "bob", true).await.unwrap();
    other.vote(TargetKind::Post, &p1, "carol", true).await.unwrap();
    other.vote(TargetKind::Comment, &x1, "bob", false).await.unwrap();
    assert_eq!(karma_settles(&client, "alice", 1).await, 1);

    // Deleting the comment gives back its -1.
    client.delete_comment(&x1, "alice").await.unwrap();
    assert_eq!(karma_settles(&client, "alice", 2).await, 2);

    client.delete_post(&p1, "alice").await.unwrap();
    assert_eq!(karma_settles(&client, "alice", 0).await, 0);

    assert_eq!(
        client.vote(TargetKind::Post, &p1, "bob", true).await,
        Err(DomainError::not_found("Post not found"))
    );

    backend.shutdown().await;
}

// --- Feed and direct messages ---

#[tokio::test]
async fn test_feed_lists_joined_communities_with_posts() {
    let backend = backend(1);
    let client = backend.client(0);
    register_all(&client, &["alice", "bob"]).await;
    client.create_community("rust", "Rustaceans", "alice").await.unwrap();
    client.create_community("go", "Gophers", "alice").await.unwrap();
    client.join_community("rust", "bob").await.unwrap();
    let post = client.create_post("rust", "Hello", "world", "alice").await.unwrap().id;
    client.create_comment(&post, None, "hi", "bob").await.unwrap();

    let feed = client.feed("bob").await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].name, "rust");
    assert_eq!(feed[0].posts[0].id, post);
    assert_eq!(feed[0].posts[0].comments[0].content, "hi");

    let names: Vec<String> = client
        .feed("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["go".to_string(), "rust".to_string()]);

    assert_eq!(
        client.feed("nobody").await,
        Err(DomainError::not_found("User not found"))
    );

    backend.shutdown().await;
}

#[tokio::test]
async fn test_direct_messages_reach_both_inboxes() {
    let backend = backend(1);
    let client = backend.client(0);

    let first = client
        .send_direct_message("alice", "bob", "hi bob", None)
        .await
        .unwrap()
        .id;
    let reply = client
        .send_direct_message("bob", "alice", "hi alice", Some(&first))
        .await
        .unwrap()
        .id;

    let ids = |inbox: Vec<social_sim::model::DirectMessage>| -> Vec<String> {
        inbox.into_iter().map(|m| m.id).collect()
    };
    let alice = ids(client.inbox("alice").await.unwrap());
    let bob = ids(client.inbox("bob").await.unwrap());
    assert_eq!(alice, vec![first, reply]);
    assert_eq!(bob, alice);

    assert_eq!(
        client
            .send_direct_message("bob", "alice", "?", Some("dm_missing"))
            .await,
        Err(DomainError::not_found("Parent message not found"))
    );

    backend.shutdown().await;
}
