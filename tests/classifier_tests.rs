//! Channel classifier tests against the default vocabulary

use mystery_admin::config::VocabularyConfig;
use mystery_admin::permissions::{Category, Classification, Classifier};
use rstest::{fixture, rstest};

#[fixture]
fn classifier() -> Classifier {
    Classifier::new(&VocabularyConfig::default()).unwrap()
}

fn clue(owner: &str) -> Classification {
    Classification::Clue {
        owner: owner.to_string(),
    }
}

fn private(a: &str, b: &str) -> Classification {
    Classification::Private {
        players: [a.to_string(), b.to_string()],
    }
}

#[rstest]
#[case("charlie-clues", clue("charlie"))]
#[case("julia-clues", clue("julia"))]
#[case("Dakota-Clues", clue("dakota"))]
#[case("group-chat", Classification::SharedChat)]
#[case("voicemail", Classification::Voicemail)]
#[case("voicemails", Classification::Voicemail)]
#[case("charlie-dakota", private("charlie", "dakota"))]
#[case("Evan-Jack", private("evan", "jack"))]
#[case("general", Classification::Unclassified)]
#[case("announcements", Classification::Unclassified)]
#[case("off-topic", Classification::Unclassified)]
#[case("bot-commands", Classification::Unclassified)]
#[case("charlie-notes", Classification::Unclassified)]
fn test_default_vocabulary(
    classifier: Classifier,
    #[case] name: &str,
    #[case] expected: Classification,
) {
    assert_eq!(classifier.classify(name), expected);
}

#[rstest]
#[case("group-chat", Category::SharedChat)]
#[case("voicemails", Category::Voicemail)]
#[case("jack-clues", Category::Clue)]
#[case("jack-julia", Category::PrivateChannel)]
#[case("off-topic", Category::PrivateChannel)]
#[case("rules", Category::Unclassified)]
#[case("game_night", Category::Unclassified)]
fn test_category_by_pattern(classifier: Classifier, #[case] name: &str, #[case] expected: Category) {
    assert_eq!(classifier.category_of(name), expected);
}

#[rstest]
#[case::unknown_players("charlie-dakota-evan")]
#[case::unknown_owner("old-case-clues")]
#[case::not_players("off-topic")]
#[case::one_player("bot-julia")]
fn test_unresolvable_private_names(classifier: Classifier, #[case] name: &str) {
    let ambiguity = classifier.try_classify(name).unwrap_err();
    assert_eq!(ambiguity.channel, name);
    assert_eq!(classifier.classify(name), Classification::Unclassified);
}

#[rstest]
fn test_custom_vocabulary_with_hyphenated_character() {
    let vocabulary = VocabularyConfig {
        characters: vec!["mary-ann".to_string(), "tom".to_string()],
        ..Default::default()
    };
    let classifier = Classifier::new(&vocabulary).unwrap();

    assert_eq!(classifier.classify("mary-ann-tom"), private("mary-ann", "tom"));
    assert_eq!(classifier.classify("tom-mary-ann"), private("tom", "mary-ann"));
    assert_eq!(classifier.classify("mary-ann-clues"), clue("mary-ann"));
}

#[rstest]
fn test_invalid_pattern_rejected() {
    let vocabulary = VocabularyConfig {
        clue: vec!["[unclosed".to_string()],
        ..Default::default()
    };
    assert!(Classifier::new(&vocabulary).is_err());
}
