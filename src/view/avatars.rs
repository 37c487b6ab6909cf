//! Demo avatar store with simulated asynchronous fetches.
//!
//! The first lookup of a known handle answers `Pending` and queues the
//! handle; the event loop later drains the queue and hands the images to the
//! list, the way a network fetch would complete.

use crate::view_state::content::{AvatarImage, AvatarLookup, AvatarResolver, AVATAR_DIAMETER};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Fetches that have "completed" and wait for delivery.
pub type FetchQueue = Rc<RefCell<Vec<String>>>;

/// Colours for the `avatar1`..`avatar6` handles.
const PALETTE: [(&str, [u8; 4]); 6] = [
    ("avatar1", [0xE5, 0x73, 0x73, 0xFF]),
    ("avatar2", [0x64, 0xB5, 0xF6, 0xFF]),
    ("avatar3", [0x81, 0xC7, 0x84, 0xFF]),
    ("avatar4", [0xFF, 0xD5, 0x4F, 0xFF]),
    ("avatar5", [0xBA, 0x68, 0xC8, 0xFF]),
    ("avatar6", [0x4D, 0xD0, 0xE1, 0xFF]),
];

/// Avatar resolver backed by a fixed palette.
#[derive(Debug)]
pub struct DemoAvatars {
    images: HashMap<String, AvatarImage>,
    fetched: HashSet<String>,
    in_flight: HashSet<String>,
    queue: FetchQueue,
}

impl DemoAvatars {
    /// Resolver plus the queue the event loop drains.
    pub fn new() -> (Self, FetchQueue) {
        let queue = FetchQueue::default();
        let images = PALETTE
            .iter()
            .map(|(name, rgba)| (name.to_string(), AvatarImage::solid(AVATAR_DIAMETER, *rgba)))
            .collect();
        let resolver = Self {
            images,
            fetched: HashSet::new(),
            in_flight: HashSet::new(),
            queue: Rc::clone(&queue),
        };
        (resolver, queue)
    }

    /// Image for a handle, regardless of fetch state.
    pub fn image(avatar_ref: &str) -> Option<AvatarImage> {
        PALETTE
            .iter()
            .find(|(name, _)| *name == avatar_ref)
            .map(|(_, rgba)| AvatarImage::solid(AVATAR_DIAMETER, *rgba))
    }
}

impl AvatarResolver for DemoAvatars {
    fn resolve(&mut self, avatar_ref: &str) -> AvatarLookup {
        let Some(image) = self.images.get(avatar_ref) else {
            return AvatarLookup::Missing;
        };
        if self.fetched.contains(avatar_ref) {
            return AvatarLookup::Ready(image.clone());
        }
        if self.in_flight.insert(avatar_ref.to_string()) {
            self.queue.borrow_mut().push(avatar_ref.to_string());
        } else {
            // Second request after the queue was drained: the fetch is done.
            if !self.queue.borrow().iter().any(|r| r == avatar_ref) {
                self.fetched.insert(avatar_ref.to_string());
                return AvatarLookup::Ready(image.clone());
            }
        }
        AvatarLookup::Pending
    }
}
