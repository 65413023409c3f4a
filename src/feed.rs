use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

/// Render target for action cards.
pub trait Feed: Send + Sync {
    /// Insert a rendered card at the top of the feed.
    fn prepend(&self, card: String);
}

/// In-memory feed container, top card first.
pub struct HtmlFeed {
    cards: RwLock<VecDeque<String>>,
    /// Oldest cards beyond this limit are dropped. `None` keeps everything.
    max_cards: Option<usize>,
}

impl HtmlFeed {
    pub fn new(max_cards: Option<usize>) -> Self {
        Self {
            cards: RwLock::new(VecDeque::new()),
            max_cards,
        }
    }

    pub fn cards(&self) -> Vec<String> {
        self.cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cards.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Feed for HtmlFeed {
    fn prepend(&self, card: String) {
        let mut cards = self.cards.write().unwrap_or_else(PoisonError::into_inner);
        cards.push_front(card);
        if let Some(max) = self.max_cards {
            cards.truncate(max);
        }
    }
}
