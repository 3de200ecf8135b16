//! # Answer Module - Choice Generation
//!
//! Derives the five-option choice set from completed spans. Both variants
//! guarantee exactly one correct option, placed at a uniformly random slot.
//!
//! Randomness is injected as a [`rand::Rng`] so callers control the source;
//! tests seed a `SmallRng` for reproducible draws. Nothing here keeps state
//! between calls - a re-roll rebuilds the whole set from scratch.

use rand::Rng;

use crate::span::{Choice, SelectionSpan};

/// Build the underline-style choice set
///
/// One choice per span, titled with the span's substitute when set and its
/// origin text otherwise. The span whose substitute was committed last is the
/// answer - the author explicitly marks which single altered span is "the
/// error".
pub fn underline_choices(spans: &[SelectionSpan], answer_index: usize) -> Vec<Choice> {
    spans
        .iter()
        .enumerate()
        .map(|(index, span)| Choice {
            title: span
                .change_text
                .clone()
                .unwrap_or_else(|| span.origin_text.clone()),
            is_answer: index == answer_index,
        })
        .collect()
}

/// Build the square-style choice set from exactly three substituted spans
///
/// Each span first gets a fresh coin-flipped `is_switched` flag - cosmetic
/// only, it controls which half of the origin/substitute pair renders first.
/// The correct choice is the all-origin composite; the four distractors draw
/// their origin/substitute patterns without replacement from the seven
/// remaining combinations, so no two distractors share a pattern.
pub fn square_choices<R: Rng + ?Sized>(rng: &mut R, spans: &mut [SelectionSpan]) -> Vec<Choice> {
    debug_assert!(spans.len() == 3, "square items carry exactly three spans");

    for span in spans.iter_mut() {
        span.is_switched = rng.random_bool(0.5);
    }

    let answer_slot = rng.random_range(0..5);

    // All-origin is the answer pattern and is never in the distractor pool.
    // The pool is rebuilt per call so draws cannot leak between generations.
    let mut pool = vec![
        [true, true, false],
        [true, false, true],
        [true, false, false],
        [false, true, true],
        [false, true, false],
        [false, false, true],
        [false, false, false],
    ];

    (0..5)
        .map(|slot| {
            if slot == answer_slot {
                return Choice {
                    title: format!(
                        "{}/{}/{}",
                        spans[0].origin_text, spans[1].origin_text, spans[2].origin_text
                    ),
                    is_answer: true,
                };
            }

            let pattern = pool.swap_remove(rng.random_range(0..pool.len()));
            Choice {
                title: format!(
                    "{}/{}/{}",
                    variant(&spans[0], pattern[0]),
                    variant(&spans[1], pattern[1]),
                    variant(&spans[2], pattern[2]),
                ),
                is_answer: false,
            }
        })
        .collect()
}

fn variant(span: &SelectionSpan, keep_origin: bool) -> &str {
    if keep_origin {
        &span.origin_text
    } else {
        span.change_text.as_deref().unwrap_or(&span.origin_text)
    }
}
