//! Queued actions.
//!
//! An [`Action`] records one deferred change together with every argument it
//! needs, so replaying the queue depends on nothing but the queue itself and
//! the resource's current path.

use super::upload::UploadedFile;
use crate::imaging::{Corner, Padding};
use std::collections::VecDeque;
use std::path::PathBuf;

/// One deferred change to an image resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Remove the image at `target` and all of its thumbnails.
    Delete { target: PathBuf },
    /// Move an uploaded temp file to the resource path.
    Upload { file: UploadedFile },
    Resize { width: u32, height: u32 },
    /// Render a resized copy of the current pixels as a thumbnail.
    Thumbnail {
        name: Option<String>,
        width: u32,
        height: u32,
    },
    /// Stamp another image onto the current pixels. Skipped if `source` is missing.
    Overlay {
        source: PathBuf,
        corner: Corner,
        padding: Padding,
    },
    /// Rename the file and retarget everything after it.
    MoveTo { destination: PathBuf },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Delete { .. } => "delete",
            Action::Upload { .. } => "upload",
            Action::Resize { .. } => "resize",
            Action::Thumbnail { .. } => "thumbnail",
            Action::Overlay { .. } => "overlay",
            Action::MoveTo { .. } => "move",
        }
    }

    /// Whether running this action can change what metadata reads report.
    pub(crate) fn changes_file(&self) -> bool {
        !matches!(self, Action::Thumbnail { .. })
    }
}

/// FIFO of pending actions.
#[derive(Debug, Default)]
pub(crate) struct ActionQueue {
    actions: VecDeque<Action>,
}

impl ActionQueue {
    pub fn push(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    pub fn pop(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    /// Drop everything queued and leave only `action`.
    pub fn reset_to(&mut self, action: Action) {
        self.actions.clear();
        self.actions.push_back(action);
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resize(w: u32) -> Action {
        Action::Resize {
            width: w,
            height: w,
        }
    }

    #[test]
    fn pops_in_insertion_order() {
        let mut queue = ActionQueue::default();
        queue.push(resize(1));
        queue.push(resize(2));
        queue.push(resize(1));

        assert_eq!(queue.pop(), Some(resize(1)));
        assert_eq!(queue.pop(), Some(resize(2)));
        assert_eq!(queue.pop(), Some(resize(1)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn reset_discards_pending() {
        let mut queue = ActionQueue::default();
        queue.push(resize(1));
        queue.push(resize(2));

        let delete = Action::Delete {
            target: "/img/a.jpg".into(),
        };
        queue.reset_to(delete.clone());

        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![&delete]);
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(resize(1).kind(), "resize");
        assert_eq!(
            Action::MoveTo {
                destination: "/a".into()
            }
            .kind(),
            "move"
        );
    }

    #[test]
    fn thumbnails_do_not_touch_main_file() {
        let thumb = Action::Thumbnail {
            name: None,
            width: 1,
            height: 1,
        };
        assert!(!thumb.changes_file());
        assert!(resize(1).changes_file());
    }
}
