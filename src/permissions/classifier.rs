//! Channel classifier
//!
//! Maps a channel name to exactly one [`Category`] using the configured
//! vocabulary, then extracts the player names embedded in clue and private
//! channel names.
//!
//! Categories are tested in a fixed order (shared chat, voicemail, clue,
//! private); the first matching one wins.

use crate::config::VocabularyConfig;
use crate::error::{ClassificationAmbiguity, ConfigError};
use crate::permissions::patterns::PatternMatcher;
use crate::permissions::types::{Category, Classification};
use std::collections::HashSet;
use tracing::{trace, warn};

/// Compiled channel vocabulary
#[derive(Debug)]
pub struct Classifier {
    shared_chat: PatternMatcher,
    voicemail: PatternMatcher,
    clue: PatternMatcher,
    private: PatternMatcher,
    roster: HashSet<String>,
}

impl Classifier {
    /// Create a new classifier from configuration
    pub fn new(config: &VocabularyConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            shared_chat: PatternMatcher::new(&config.shared_chat)?,
            voicemail: PatternMatcher::new(&config.voicemail)?,
            clue: PatternMatcher::new(&config.clue)?,
            private: PatternMatcher::new(&config.private)?,
            roster: config.characters.iter().map(|c| c.to_lowercase()).collect(),
        })
    }

    /// Category of a channel name, by pattern alone
    pub fn category_of(&self, name: &str) -> Category {
        let category = if self.shared_chat.matches(name) {
            Category::SharedChat
        } else if self.voicemail.matches(name) {
            Category::Voicemail
        } else if self.clue.matches(name) {
            Category::Clue
        } else if self.private.matches(name) {
            Category::PrivateChannel
        } else {
            Category::Unclassified
        };
        trace!(channel = name, category = %category, "Classified channel name");
        category
    }

    /// Classify a channel name, failing when its player segments cannot be
    /// resolved
    pub fn try_classify(&self, name: &str) -> Result<Classification, ClassificationAmbiguity> {
        let name = name.to_lowercase();
        match self.category_of(&name) {
            Category::SharedChat => Ok(Classification::SharedChat),
            Category::Voicemail => Ok(Classification::Voicemail),
            Category::Clue => {
                let (owner, _topic) = self.split(&name, |owner, _| self.roster.contains(owner))?;
                Ok(Classification::Clue {
                    owner: owner.to_string(),
                })
            }
            Category::PrivateChannel => {
                let (a, b) = self.split(&name, |a, b| {
                    self.roster.contains(a) && self.roster.contains(b)
                })?;
                Ok(Classification::Private {
                    players: [a.to_string(), b.to_string()],
                })
            }
            Category::Unclassified => Ok(Classification::Unclassified),
        }
    }

    /// Classify a channel name; ambiguous names are unclassified
    pub fn classify(&self, name: &str) -> Classification {
        self.try_classify(name).unwrap_or_else(|ambiguity| {
            warn!(channel = name, reason = %ambiguity.reason, "Leaving ambiguous channel unclassified");
            Classification::Unclassified
        })
    }

    /// Split `name` at a hyphen into two non-empty segments
    ///
    /// Only split points whose segments satisfy `known` are candidates, and
    /// exactly one must remain. Names like `off-topic` that fit the pattern
    /// but not the roster are rejected here and never managed.
    fn split<'a>(
        &self,
        name: &'a str,
        known: impl Fn(&str, &str) -> bool,
    ) -> Result<(&'a str, &'a str), ClassificationAmbiguity> {
        let points: Vec<usize> = name.match_indices('-').map(|(i, _)| i).collect();

        match points.as_slice() {
            [] => Err(ClassificationAmbiguity::no_split(name)),
            [i] => {
                let (left, right) = (&name[..*i], &name[i + 1..]);
                if left.is_empty() || right.is_empty() {
                    return Err(ClassificationAmbiguity::empty_segment(name));
                }
                if !known(left, right) {
                    return Err(ClassificationAmbiguity::no_split(name));
                }
                Ok((left, right))
            }
            _ => {
                let candidates: Vec<(&str, &str)> = points
                    .iter()
                    .map(|i| (&name[..*i], &name[i + 1..]))
                    .filter(|(l, r)| !l.is_empty() && !r.is_empty() && known(l, r))
                    .collect();

                match candidates.as_slice() {
                    [only] => Ok(*only),
                    [] => Err(ClassificationAmbiguity::no_split(name)),
                    many => Err(ClassificationAmbiguity::many_splits(name, many.len())),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(characters: &[&str]) -> VocabularyConfig {
        VocabularyConfig {
            clue: vec!["-(clues|diary)$".to_string()],
            shared_chat: vec!["^group-chat$".to_string()],
            voicemail: vec!["^voicemails$".to_string()],
            private: vec!["^[a-z]+(-[a-z]+)+$".to_string()],
            characters: characters.iter().map(|c| c.to_string()).collect(),
            spectator_role: "Spectator".to_string(),
        }
    }

    fn classifier(characters: &[&str]) -> Classifier {
        Classifier::new(&vocabulary(characters)).unwrap()
    }

    #[test]
    fn test_shared_chat_wins_over_private_shape() {
        let c = classifier(&["group", "chat"]);
        assert_eq!(c.classify("group-chat"), Classification::SharedChat);
    }

    #[test]
    fn test_voicemail() {
        let c = classifier(&[]);
        assert_eq!(c.classify("voicemails"), Classification::Voicemail);
    }

    #[test]
    fn test_clue_owner_from_first_segment() {
        let c = classifier(&["alice"]);
        assert_eq!(
            c.classify("alice-diary"),
            Classification::Clue {
                owner: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_private_pair() {
        let c = classifier(&["alice", "bob"]);
        assert_eq!(
            c.classify("alice-bob"),
            Classification::Private {
                players: ["alice".to_string(), "bob".to_string()]
            }
        );
    }

    #[test]
    fn test_unmatched_is_unclassified() {
        let c = classifier(&["alice"]);
        assert_eq!(c.classify("general"), Classification::Unclassified);
        assert_eq!(c.category_of("General Chat"), Category::Unclassified);
    }

    #[test]
    fn test_hyphenated_character_resolved_from_roster() {
        let c = classifier(&["mary-jane", "bob"]);
        assert_eq!(
            c.classify("mary-jane-bob"),
            Classification::Private {
                players: ["mary-jane".to_string(), "bob".to_string()]
            }
        );
        assert_eq!(
            c.classify("mary-jane-diary"),
            Classification::Clue {
                owner: "mary-jane".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_hyphenated_name_is_ambiguous() {
        let c = classifier(&["alice", "bob"]);
        let err = c.try_classify("mary-jane-bob").unwrap_err();
        assert_eq!(err.channel, "mary-jane-bob");
        assert_eq!(c.classify("mary-jane-bob"), Classification::Unclassified);
    }

    #[test]
    fn test_several_splits_are_ambiguous() {
        let c = classifier(&["a", "a-b", "b-c", "c"]);
        let err = c.try_classify("a-b-c").unwrap_err();
        assert!(err.reason.contains('2'));
    }

    #[test]
    fn test_single_hyphen_needs_roster_names() {
        let c = classifier(&["alice", "bob"]);
        for name in ["off-topic", "alice-topic", "game-diary"] {
            assert!(c.try_classify(name).is_err(), "{name} should not be managed");
            assert_eq!(c.classify(name), Classification::Unclassified);
        }
    }

    #[test]
    fn test_classification_ignores_case() {
        let c = classifier(&["alice", "bob"]);
        assert_eq!(c.category_of("alice-bob"), Category::PrivateChannel);
        assert_eq!(c.classify("Alice-Bob").category(), Category::PrivateChannel);
    }
}
