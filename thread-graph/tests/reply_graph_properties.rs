use proptest::prelude::*;
use thread_graph::{Post, Thread};
use thread_msg::PostAttrs;
use thread_ref::{GlobalId, Hsl, IdentityKey, LocalId, ReplyTarget, ThreadId};

fn attrs(id: u64, target: u64) -> PostAttrs {
    PostAttrs {
        local_id: LocalId::new(id).unwrap(),
        global_id: GlobalId::from_string(id.to_string()).unwrap(),
        reply_target: ReplyTarget::from_string(target.to_string()).unwrap(),
        identity: IdentityKey::from_string(format!("u{}", id % 3)).unwrap(),
        color: Hsl::new(0, 0, 0),
        marker: None,
        comment: String::new(),
        omission: false,
    }
}

// Arbitrary targets, including forward references, self references and
// ids that never appear, so cycles and dangling links are both generated.
fn arbitrary_thread() -> impl Strategy<Value = Thread> {
    prop::collection::vec(0u64..40, 1..30).prop_map(|targets| {
        let mut thread = Thread::new(ThreadId::from_string("p".into()).unwrap(), false, 0);
        for (i, target) in targets.into_iter().enumerate() {
            let post: Post = attrs(i as u64 + 1, target).into();
            thread.push(post).unwrap();
        }
        thread
    })
}

proptest! {
    #[test]
    fn ancestor_chain_is_finite_and_unique(thread in arbitrary_thread()) {
        for id in thread.ids() {
            let chain = thread.ancestor_chain(id);
            prop_assert!(chain.len() < thread.len());
            prop_assert!(!chain.contains(&id));
            let mut sorted = chain.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), chain.len());
        }
    }

    #[test]
    fn post_is_never_its_own_descendant(thread in arbitrary_thread()) {
        for id in thread.ids() {
            let descendants = thread.descendants(id);
            prop_assert!(!descendants.contains(&id));
            for child in thread.children(id) {
                prop_assert!(descendants.contains(&child));
            }
        }
    }
}
