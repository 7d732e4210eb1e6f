// src/jokes.rs

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A single joke with its like counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub id: u64,
    pub likes: u64,
    pub joke: String,
}

/// The in-memory joke list, shared across request handlers.
///
/// Mutation goes through the write lock so concurrent likes never lose
/// increments. Jokes are seeded at startup and never deleted, so ids stay
/// unique and like counters only grow.
#[derive(Clone)]
pub struct JokeStore {
    inner: Arc<RwLock<Vec<Joke>>>,
}

impl JokeStore {
    pub fn new(jokes: Vec<Joke>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(jokes)),
        }
    }

    /// The fixed seed list the service starts with.
    pub fn with_seed_jokes() -> Self {
        let texts = [
            "Did you hear about the restaurant on the moon? Great food, no atmosphere.",
            "What do you call a fake noodle? An Impasta.",
            "How many apples grow on a tree? All of them.",
            "Want to hear a joke about paper? Nevermind it's tearable.",
            "I just watched a program about beavers. It was the best dam program I've ever seen.",
            "Why did the coffee file a police report? It got mugged.",
            "How does a penguin build it's house? Igloos it together.",
        ];
        let jokes = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Joke {
                id: i as u64 + 1,
                likes: 0,
                joke: (*text).to_string(),
            })
            .collect();
        Self::new(jokes)
    }

    /// Returns a snapshot of the list in insertion order.
    pub async fn list(&self) -> Vec<Joke> {
        self.inner.read().await.clone()
    }

    /// Increments the like counter of the joke with the given id.
    ///
    /// Returns the updated joke, or `None` when no joke has that id.
    pub async fn like(&self, id: u64) -> Option<Joke> {
        let mut jokes = self.inner.write().await;
        let joke = jokes.iter_mut().find(|joke| joke.id == id)?;
        joke.likes += 1;
        Some(joke.clone())
    }
}
