use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use thiserror::Error as ThisError;
use thread_msg::{PostAttrs, ThreadAttrs};
use thread_ref::{GlobalId, Hsl, IdentityKey, LocalId, ReplyTarget, ThreadId};

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum GraphError {
    #[error("Post {0} is already in the thread")]
    DuplicateLocalId(LocalId),
}

#[derive(Clone, Debug)]
pub struct Post {
    pub local_id: LocalId,
    pub global_id: GlobalId,
    pub identity: IdentityKey,
    pub color_seed: Hsl,
    pub marker: Option<String>,
    pub reply_target: ReplyTarget,
    pub comment: String,
    pub omission: bool,
    back_refs: Vec<LocalId>,
}

impl Post {
    /// Replies linked back into this post's body, in the order they arrived.
    pub fn back_refs(&self) -> &[LocalId] {
        &self.back_refs
    }
}

impl From<PostAttrs> for Post {
    fn from(attrs: PostAttrs) -> Self {
        Post {
            local_id: attrs.local_id,
            global_id: attrs.global_id,
            identity: attrs.identity,
            color_seed: attrs.color,
            marker: attrs.marker,
            reply_target: attrs.reply_target,
            comment: attrs.comment,
            omission: attrs.omission,
            back_refs: Vec::new(),
        }
    }
}

/// Posts of one thread view in arrival order, indexed by local id and by
/// reply target.
#[derive(Clone, Debug)]
pub struct Thread {
    id: ThreadId,
    locked: bool,
    view_marker: u64,
    posts: Vec<Post>,
    index: HashMap<LocalId, usize>,
    replies: HashMap<LocalId, Vec<LocalId>>,
}

impl Thread {
    pub fn new(id: ThreadId, locked: bool, view_marker: u64) -> Self {
        Thread {
            id,
            locked,
            view_marker,
            posts: Vec::new(),
            index: HashMap::new(),
            replies: HashMap::new(),
        }
    }

    /// Builds the graph from a server render. The server has already linked
    /// every reply back into its target, so back-references are rebuilt here.
    pub fn from_attrs(attrs: ThreadAttrs) -> Result<Self, GraphError> {
        let mut thread = Thread::new(attrs.thread_id, attrs.locked, attrs.view_marker);
        for post in attrs.posts {
            thread.push(post.into())?;
        }
        let ids: Vec<LocalId> = thread.posts.iter().map(|post| post.local_id).collect();
        for id in ids {
            thread.bind_reply(id);
        }
        Ok(thread)
    }

    pub fn id(&self) -> &ThreadId {
        &self.id
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn view_marker(&self) -> u64 {
        self.view_marker
    }

    pub fn identity_scope(&self) -> String {
        self.id.identity_scope(self.view_marker)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn contains(&self, id: LocalId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: LocalId) -> Option<&Post> {
        self.index.get(&id).map(|&i| &self.posts[i])
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = LocalId> + '_ {
        self.posts.iter().map(|post| post.local_id)
    }

    pub fn last(&self) -> Option<&Post> {
        self.posts.last()
    }

    /// Appends a post, keeping arrival order.
    pub fn push(&mut self, post: Post) -> Result<LocalId, GraphError> {
        let id = post.local_id;
        if self.contains(id) {
            return Err(GraphError::DuplicateLocalId(id));
        }
        if let Some(target) = post.reply_target.local_id() {
            self.replies.entry(target).or_default().push(id);
        }
        self.index.insert(id, self.posts.len());
        self.posts.push(post);
        Ok(id)
    }

    /// Resolves the post `id` replies to. Self-references and targets
    /// missing from the view resolve to `None`.
    pub fn target_of(&self, id: LocalId) -> Option<LocalId> {
        let target = self.get(id)?.reply_target.local_id()?;
        if target == id {
            debug!("post {} replies to itself, treating as root", id);
            return None;
        }
        if !self.contains(target) {
            debug!("post {} replies to missing post {}, treating as root", id, target);
            return None;
        }
        Some(target)
    }

    /// Walks reply targets from `id` towards the root, nearest first. Stops
    /// at the root, at a missing target, or when a post repeats.
    pub fn ancestor_chain(&self, id: LocalId) -> Vec<LocalId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut cursor = self.target_of(id);
        while let Some(ancestor) = cursor {
            if !seen.insert(ancestor) {
                debug!("reply cycle through post {}, truncating chain", ancestor);
                break;
            }
            chain.push(ancestor);
            cursor = self.target_of(ancestor);
        }
        chain
    }

    /// Direct replies to `id`, in arrival order.
    pub fn children(&self, id: LocalId) -> Vec<LocalId> {
        self.replies
            .get(&id)
            .map(|replies| {
                replies
                    .iter()
                    .copied()
                    .filter(|&reply| reply != id && self.contains(reply))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every post whose reply chain reaches `id`. Never contains `id` itself.
    pub fn descendants(&self, id: LocalId) -> HashSet<LocalId> {
        let mut found = HashSet::new();
        let mut stack = self.children(id);
        while let Some(next) = stack.pop() {
            if next == id {
                debug!("reply cycle back to post {}, skipping", id);
                continue;
            }
            if found.insert(next) {
                stack.extend(self.children(next));
            }
        }
        found
    }

    pub fn posts_by_identity(&self, identity: &IdentityKey) -> Vec<LocalId> {
        self.posts
            .iter()
            .filter(|post| &post.identity == identity)
            .map(|post| post.local_id)
            .collect()
    }

    /// Links `reply` back into the body of the post it targets. Returns the
    /// target, or `None` when the reply has no target in this view. Linking
    /// the same reply twice is a no-op.
    pub fn bind_reply(&mut self, reply: LocalId) -> Option<LocalId> {
        let target = self.target_of(reply)?;
        let index = self.index[&target];
        let back_refs = &mut self.posts[index].back_refs;
        if !back_refs.contains(&reply) {
            trace!("link reply {} back into post {}", reply, target);
            back_refs.push(reply);
        }
        Some(target)
    }
}
