//! Character-level edit script with semantic cleanup.
//!
//! The script is computed in three stages:
//!
//! 1. [`diff_main`]: common prefix/suffix trimming, a few shortcuts for
//!    trivially related inputs, then Myers' O(ND) middle-snake bisection.
//! 2. [`cleanup_merge`]: merges runs of like edits, factors text shared by a
//!    deletion and an insertion out into the neighbouring equalities, and
//!    slides single edits sideways to absorb duplicated equalities.
//! 3. [`cleanup_semantic`]: turns short equalities that sit between larger
//!    edits into edits, aligns edits with word boundaries, and extracts
//!    overlaps between adjacent deletions and insertions.
//!
//! The result is a minimal-ish script biased toward long unchanged runs,
//! which is what makes the spans readable.

use crate::types::DiffEvent;

/// One step of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub(crate) event: DiffEvent,
    pub(crate) text: Vec<char>,
}

impl Edit {
    pub(crate) fn new(event: DiffEvent, text: Vec<char>) -> Self {
        Self { event, text }
    }
}

/// Full pipeline: raw script followed by semantic cleanup.
pub(crate) fn diff(old: &[char], new: &[char]) -> Vec<Edit> {
    let mut edits = diff_main(old, new);
    cleanup_semantic(&mut edits);
    edits
}

pub(crate) fn diff_main(old: &[char], new: &[char]) -> Vec<Edit> {
    if old == new {
        return if old.is_empty() {
            Vec::new()
        } else {
            vec![Edit::new(DiffEvent::Unchanged, old.to_vec())]
        };
    }

    let prefix_len = common_prefix(old, new);
    let prefix = &old[..prefix_len];
    let (old, new) = (&old[prefix_len..], &new[prefix_len..]);

    let suffix_len = common_suffix(old, new);
    let suffix = &old[old.len() - suffix_len..];
    let (old, new) = (&old[..old.len() - suffix_len], &new[..new.len() - suffix_len]);

    let mut edits = compute(old, new);
    if !prefix.is_empty() {
        edits.insert(0, Edit::new(DiffEvent::Unchanged, prefix.to_vec()));
    }
    if !suffix.is_empty() {
        edits.push(Edit::new(DiffEvent::Unchanged, suffix.to_vec()));
    }
    cleanup_merge(&mut edits);
    edits
}

fn compute(old: &[char], new: &[char]) -> Vec<Edit> {
    if old.is_empty() {
        return vec![Edit::new(DiffEvent::Inserted, new.to_vec())];
    }
    if new.is_empty() {
        return vec![Edit::new(DiffEvent::Deleted, old.to_vec())];
    }

    let (long, short, event) = if old.len() > new.len() {
        (old, new, DiffEvent::Deleted)
    } else {
        (new, old, DiffEvent::Inserted)
    };

    if let Some(at) = find(long, short) {
        let mut edits = Vec::with_capacity(3);
        if at > 0 {
            edits.push(Edit::new(event, long[..at].to_vec()));
        }
        edits.push(Edit::new(DiffEvent::Unchanged, short.to_vec()));
        if at + short.len() < long.len() {
            edits.push(Edit::new(event, long[at + short.len()..].to_vec()));
        }
        return edits;
    }

    if short.len() == 1 {
        return vec![
            Edit::new(DiffEvent::Deleted, old.to_vec()),
            Edit::new(DiffEvent::Inserted, new.to_vec()),
        ];
    }

    bisect(old, new)
}

/// Find the middle snake and recurse on both halves.
fn bisect(old: &[char], new: &[char]) -> Vec<Edit> {
    let old_len = old.len() as isize;
    let new_len = new.len() as isize;
    let max_d = (old_len + new_len + 1) / 2;
    let v_offset = max_d;
    let v_length = 2 * max_d;

    let mut v1 = vec![-1isize; v_length as usize];
    let mut v2 = vec![-1isize; v_length as usize];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;

    let delta = old_len - new_len;
    // With an odd delta the forward path collides with the reverse path.
    let front = delta % 2 != 0;

    let (mut k1_start, mut k1_end, mut k2_start, mut k2_end) = (0isize, 0isize, 0isize, 0isize);

    for d in 0..max_d {
        // Forward path.
        let mut k1 = -d + k1_start;
        while k1 <= d - k1_end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < old_len && y1 < new_len && old[x1 as usize] == new[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;
            if x1 > old_len {
                k1_end += 2;
            } else if y1 > new_len {
                k1_start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if (0..v_length).contains(&k2_offset) && v2[k2_offset as usize] != -1 {
                    let x2 = old_len - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return bisect_split(old, new, x1 as usize, y1 as usize);
                    }
                }
            }
            k1 += 2;
        }

        // Reverse path.
        let mut k2 = -d + k2_start;
        while k2 <= d - k2_end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < old_len
                && y2 < new_len
                && old[(old_len - x2 - 1) as usize] == new[(new_len - y2 - 1) as usize]
            {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;
            if x2 > old_len {
                k2_end += 2;
            } else if y2 > new_len {
                k2_start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if (0..v_length).contains(&k1_offset) && v1[k1_offset as usize] != -1 {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    if x1 >= old_len - x2 {
                        return bisect_split(old, new, x1 as usize, y1 as usize);
                    }
                }
            }
            k2 += 2;
        }
    }

    // No commonality at all.
    vec![
        Edit::new(DiffEvent::Deleted, old.to_vec()),
        Edit::new(DiffEvent::Inserted, new.to_vec()),
    ]
}

fn bisect_split(old: &[char], new: &[char], x: usize, y: usize) -> Vec<Edit> {
    let mut edits = diff_main(&old[..x], &new[..y]);
    edits.extend(diff_main(&old[x..], &new[y..]));
    edits
}

/// Reorder and merge like edit sections, factoring out commonalities.
pub(crate) fn cleanup_merge(edits: &mut Vec<Edit>) {
    loop {
        // Sentinel equality flushes the last run.
        edits.push(Edit::new(DiffEvent::Unchanged, Vec::new()));
        let mut pointer = 0usize;
        let mut count_delete = 0usize;
        let mut count_insert = 0usize;
        let mut text_delete: Vec<char> = Vec::new();
        let mut text_insert: Vec<char> = Vec::new();

        while pointer < edits.len() {
            match edits[pointer].event {
                DiffEvent::Inserted => {
                    count_insert += 1;
                    text_insert.extend_from_slice(&edits[pointer].text);
                    pointer += 1;
                }
                DiffEvent::Deleted => {
                    count_delete += 1;
                    text_delete.extend_from_slice(&edits[pointer].text);
                    pointer += 1;
                }
                DiffEvent::Unchanged => {
                    if count_delete + count_insert > 1 {
                        let start = pointer - count_delete - count_insert;
                        if count_delete != 0 && count_insert != 0 {
                            let common = common_prefix(&text_insert, &text_delete);
                            if common != 0 {
                                if start > 0 && edits[start - 1].event == DiffEvent::Unchanged {
                                    edits[start - 1]
                                        .text
                                        .extend_from_slice(&text_insert[..common]);
                                } else {
                                    edits.insert(
                                        start,
                                        Edit::new(
                                            DiffEvent::Unchanged,
                                            text_insert[..common].to_vec(),
                                        ),
                                    );
                                    pointer += 1;
                                }
                                text_insert.drain(..common);
                                text_delete.drain(..common);
                            }
                            let common = common_suffix(&text_insert, &text_delete);
                            if common != 0 {
                                let mut merged = text_insert[text_insert.len() - common..].to_vec();
                                merged.extend_from_slice(&edits[pointer].text);
                                edits[pointer].text = merged;
                                text_insert.truncate(text_insert.len() - common);
                                text_delete.truncate(text_delete.len() - common);
                            }
                        }

                        let start = pointer - count_delete - count_insert;
                        let mut replacement = Vec::with_capacity(2);
                        if !text_delete.is_empty() {
                            replacement.push(Edit::new(
                                DiffEvent::Deleted,
                                std::mem::take(&mut text_delete),
                            ));
                        }
                        if !text_insert.is_empty() {
                            replacement.push(Edit::new(
                                DiffEvent::Inserted,
                                std::mem::take(&mut text_insert),
                            ));
                        }
                        let replaced = replacement.len();
                        edits.splice(start..pointer, replacement);
                        pointer = start + replaced + 1;
                    } else if pointer != 0 && edits[pointer - 1].event == DiffEvent::Unchanged {
                        let text = edits.remove(pointer).text;
                        edits[pointer - 1].text.extend(text);
                    } else {
                        pointer += 1;
                    }
                    count_delete = 0;
                    count_insert = 0;
                    text_delete.clear();
                    text_insert.clear();
                }
            }
        }
        if edits.last().is_some_and(|edit| edit.text.is_empty()) {
            edits.pop();
        }

        // Slide single edits surrounded by equalities to eliminate one of
        // them: A<ins>BA</ins>C -> <ins>AB</ins>AC.
        let mut changes = false;
        let mut pointer = 1usize;
        while pointer + 1 < edits.len() {
            if edits[pointer - 1].event == DiffEvent::Unchanged
                && edits[pointer + 1].event == DiffEvent::Unchanged
            {
                let previous = edits[pointer - 1].text.clone();
                let current = edits[pointer].text.clone();
                let next = edits[pointer + 1].text.clone();
                if current.ends_with(&previous) {
                    let mut shifted = previous.clone();
                    shifted.extend_from_slice(&current[..current.len() - previous.len()]);
                    edits[pointer].text = shifted;
                    let mut following = previous;
                    following.extend(next);
                    edits[pointer + 1].text = following;
                    edits.remove(pointer - 1);
                    changes = true;
                } else if current.starts_with(&next) {
                    edits[pointer - 1].text.extend_from_slice(&next);
                    let mut shifted = current[next.len()..].to_vec();
                    shifted.extend_from_slice(&next);
                    edits[pointer].text = shifted;
                    edits.remove(pointer + 1);
                    changes = true;
                }
            }
            pointer += 1;
        }
        if !changes {
            break;
        }
    }
}

/// Eliminate semantically trivial equalities, then polish boundaries.
pub(crate) fn cleanup_semantic(edits: &mut Vec<Edit>) {
    let mut changes = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;
    // Signed: elimination can rewind to before the first edit.
    let mut pointer: isize = 0;
    // Edit lengths before and after the last equality.
    let (mut inserted_before, mut deleted_before) = (0usize, 0usize);
    let (mut inserted_after, mut deleted_after) = (0usize, 0usize);

    while (pointer as usize) < edits.len() {
        let index = pointer as usize;
        if edits[index].event == DiffEvent::Unchanged {
            equalities.push(index);
            inserted_before = inserted_after;
            deleted_before = deleted_after;
            inserted_after = 0;
            deleted_after = 0;
            last_equality = Some(edits[index].text.clone());
        } else {
            if edits[index].event == DiffEvent::Inserted {
                inserted_after += edits[index].text.len();
            } else {
                deleted_after += edits[index].text.len();
            }
            let eliminate = match (&last_equality, equalities.last()) {
                (Some(equality), Some(_)) => {
                    equality.len() <= inserted_before.max(deleted_before)
                        && equality.len() <= inserted_after.max(deleted_after)
                }
                _ => false,
            };
            if eliminate {
                if let (Some(equality), Some(at)) = (last_equality.take(), equalities.pop()) {
                    edits.insert(at, Edit::new(DiffEvent::Deleted, equality.clone()));
                    edits[at + 1] = Edit::new(DiffEvent::Inserted, equality);
                    // The equality before this one has to be re-evaluated.
                    equalities.pop();
                    pointer = equalities.last().map_or(-1, |&i| i as isize);
                    inserted_before = 0;
                    deleted_before = 0;
                    inserted_after = 0;
                    deleted_after = 0;
                    changes = true;
                }
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(edits);
    }
    cleanup_semantic_lossless(edits);
    extract_overlaps(edits);
}

/// Slide edits bounded by equalities to the best-scoring boundary.
fn cleanup_semantic_lossless(edits: &mut Vec<Edit>) {
    let mut pointer = 1usize;
    while pointer + 1 < edits.len() {
        if edits[pointer - 1].event == DiffEvent::Unchanged
            && edits[pointer + 1].event == DiffEvent::Unchanged
        {
            let mut equality1 = edits[pointer - 1].text.clone();
            let mut edit = edits[pointer].text.clone();
            let mut equality2 = edits[pointer + 1].text.clone();

            // Shift the edit as far left as possible first.
            let common = common_suffix(&equality1, &edit);
            if common > 0 {
                let common_text = edit[edit.len() - common..].to_vec();
                equality1.truncate(equality1.len() - common);
                let mut shifted = common_text.clone();
                shifted.extend_from_slice(&edit[..edit.len() - common]);
                edit = shifted;
                let mut following = common_text;
                following.extend(equality2);
                equality2 = following;
            }

            // Then step right one character at a time, keeping the best fit.
            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score =
                boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);
            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2[0]);
                equality2.remove(0);
                let score = boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);
                // `>=` prefers the rightmost among equal scores.
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if edits[pointer - 1].text != best_equality1 {
                if best_equality1.is_empty() {
                    edits.remove(pointer - 1);
                    pointer -= 1;
                } else {
                    edits[pointer - 1].text = best_equality1;
                }
                edits[pointer].text = best_edit;
                if best_equality2.is_empty() {
                    edits.remove(pointer + 1);
                    pointer = pointer.saturating_sub(1);
                } else {
                    edits[pointer + 1].text = best_equality2;
                }
            }
        }
        pointer += 1;
    }
}

/// Turn `<del>abcxxx</del><ins>xxxdef</ins>` into
/// `<del>abc</del>xxx<ins>def</ins>` when the overlap is at least half of
/// either edit.
fn extract_overlaps(edits: &mut Vec<Edit>) {
    let mut pointer = 1usize;
    while pointer < edits.len() {
        if edits[pointer - 1].event == DiffEvent::Deleted
            && edits[pointer].event == DiffEvent::Inserted
        {
            let deletion = edits[pointer - 1].text.clone();
            let insertion = edits[pointer].text.clone();
            let forward = common_overlap(&deletion, &insertion);
            let reverse = common_overlap(&insertion, &deletion);
            if forward >= reverse {
                if forward * 2 >= deletion.len() || forward * 2 >= insertion.len() {
                    edits.insert(
                        pointer,
                        Edit::new(DiffEvent::Unchanged, insertion[..forward].to_vec()),
                    );
                    edits[pointer - 1].text = deletion[..deletion.len() - forward].to_vec();
                    edits[pointer + 1].text = insertion[forward..].to_vec();
                    pointer += 1;
                }
            } else if reverse * 2 >= deletion.len() || reverse * 2 >= insertion.len() {
                edits.insert(
                    pointer,
                    Edit::new(DiffEvent::Unchanged, deletion[..reverse].to_vec()),
                );
                edits[pointer - 1] = Edit::new(
                    DiffEvent::Inserted,
                    insertion[..insertion.len() - reverse].to_vec(),
                );
                edits[pointer + 1] = Edit::new(DiffEvent::Deleted, deletion[reverse..].to_vec());
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
}

/// Score how natural the boundary between `one` and `two` is; higher is
/// better. Edges score 6, blank lines 5, line breaks 4, sentence ends 3,
/// whitespace 2, other punctuation 1.
fn boundary_score(one: &[char], two: &[char]) -> u32 {
    let (Some(&last), Some(&first)) = (one.last(), two.first()) else {
        return 6;
    };

    let non_alnum1 = !last.is_alphanumeric();
    let non_alnum2 = !first.is_alphanumeric();
    let whitespace1 = non_alnum1 && last.is_whitespace();
    let whitespace2 = non_alnum2 && first.is_whitespace();
    let line_break1 = whitespace1 && matches!(last, '\r' | '\n');
    let line_break2 = whitespace2 && matches!(first, '\r' | '\n');
    let blank_line1 = line_break1 && (one.ends_with(&['\n', '\n']) || one.ends_with(&['\n', '\r', '\n']));
    let blank_line2 = line_break2
        && (two.starts_with(&['\n', '\n'])
            || two.starts_with(&['\n', '\r', '\n'])
            || two.starts_with(&['\r', '\n', '\n'])
            || two.starts_with(&['\r', '\n', '\r', '\n']));

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alnum1 && !whitespace1 && whitespace2 {
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alnum1 || non_alnum2 {
        1
    } else {
        0
    }
}

pub(crate) fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

pub(crate) fn common_suffix(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Length of the longest suffix of `a` that is also a prefix of `b`.
fn common_overlap(a: &[char], b: &[char]) -> usize {
    let max = a.len().min(b.len());
    (1..=max)
        .rev()
        .find(|&k| a[a.len() - k..] == b[..k])
        .unwrap_or(0)
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn render(edits: &[Edit]) -> Vec<(DiffEvent, String)> {
        edits
            .iter()
            .map(|e| (e.event, e.text.iter().collect()))
            .collect()
    }

    fn rebuild(edits: &[Edit], skip: DiffEvent) -> String {
        edits
            .iter()
            .filter(|e| e.event != skip)
            .flat_map(|e| e.text.iter())
            .collect()
    }

    #[test]
    fn identical_and_empty_inputs() {
        assert!(diff(&[], &[]).is_empty());
        assert_eq!(
            render(&diff(&chars("abc"), &chars("abc"))),
            vec![(DiffEvent::Unchanged, "abc".to_string())]
        );
        assert_eq!(
            render(&diff(&[], &chars("abc"))),
            vec![(DiffEvent::Inserted, "abc".to_string())]
        );
        assert_eq!(
            render(&diff(&chars("abc"), &[])),
            vec![(DiffEvent::Deleted, "abc".to_string())]
        );
    }

    #[test]
    fn containment_shortcut() {
        let edits = diff_main(&chars("xabcx"), &chars("abc"));
        assert_eq!(
            render(&edits),
            vec![
                (DiffEvent::Deleted, "x".to_string()),
                (DiffEvent::Unchanged, "abc".to_string()),
                (DiffEvent::Deleted, "x".to_string()),
            ]
        );
    }

    #[test]
    fn bisect_finds_interleaved_edits() {
        let edits = diff_main(&chars("cat"), &chars("map"));
        assert_eq!(
            render(&edits),
            vec![
                (DiffEvent::Deleted, "c".to_string()),
                (DiffEvent::Inserted, "m".to_string()),
                (DiffEvent::Unchanged, "a".to_string()),
                (DiffEvent::Deleted, "t".to_string()),
                (DiffEvent::Inserted, "p".to_string()),
            ]
        );
    }

    #[test]
    fn semantic_cleanup_removes_short_equalities() {
        // The raw script keeps "o" and "s"; neither survives semantic cleanup.
        let edits = diff(&chars("mouse"), &chars("sofas"));
        assert_eq!(
            render(&edits),
            vec![
                (DiffEvent::Deleted, "mouse".to_string()),
                (DiffEvent::Inserted, "sofas".to_string()),
            ]
        );
    }

    #[test]
    fn lossless_prefers_word_boundaries() {
        let mut edits = vec![
            Edit::new(DiffEvent::Unchanged, chars("The c")),
            Edit::new(DiffEvent::Inserted, chars("ow and the c")),
            Edit::new(DiffEvent::Unchanged, chars("at.")),
        ];
        cleanup_semantic_lossless(&mut edits);
        assert_eq!(
            render(&edits),
            vec![
                (DiffEvent::Unchanged, "The ".to_string()),
                (DiffEvent::Inserted, "cow and the ".to_string()),
                (DiffEvent::Unchanged, "cat.".to_string()),
            ]
        );
    }

    #[test]
    fn overlap_becomes_equality() {
        let mut edits = vec![
            Edit::new(DiffEvent::Deleted, chars("abcxxx")),
            Edit::new(DiffEvent::Inserted, chars("xxxdef")),
        ];
        extract_overlaps(&mut edits);
        assert_eq!(
            render(&edits),
            vec![
                (DiffEvent::Deleted, "abc".to_string()),
                (DiffEvent::Unchanged, "xxx".to_string()),
                (DiffEvent::Inserted, "def".to_string()),
            ]
        );
    }

    #[test]
    fn merge_factors_common_affixes() {
        let mut edits = vec![
            Edit::new(DiffEvent::Deleted, chars("a")),
            Edit::new(DiffEvent::Inserted, chars("abc")),
            Edit::new(DiffEvent::Deleted, chars("dc")),
        ];
        cleanup_merge(&mut edits);
        assert_eq!(
            render(&edits),
            vec![
                (DiffEvent::Unchanged, "a".to_string()),
                (DiffEvent::Deleted, "d".to_string()),
                (DiffEvent::Inserted, "b".to_string()),
                (DiffEvent::Unchanged, "c".to_string()),
            ]
        );
    }

    #[test]
    fn reconstructs_both_sides() {
        let cases = [
            ("the quick brown fox", "the quick red fox jumps"),
            ("abc de abc", "de abc abc de"),
            ("xy xy xy", "yx"),
            ("", "only new"),
            ("greek mythology", "norse mythology"),
            ("a b c d e f g", "g f e d c b a"),
        ];
        for (old, new) in cases {
            let edits = diff(&chars(old), &chars(new));
            assert_eq!(rebuild(&edits, DiffEvent::Inserted), old, "old side of {old:?}");
            assert_eq!(rebuild(&edits, DiffEvent::Deleted), new, "new side of {new:?}");
        }
    }

    #[test]
    fn boundary_scores() {
        assert_eq!(boundary_score(&[], &chars("a")), 6);
        assert_eq!(boundary_score(&chars("a\n\n"), &chars("b")), 5);
        assert_eq!(boundary_score(&chars("a\n"), &chars("b")), 4);
        assert_eq!(boundary_score(&chars("a."), &chars(" b")), 3);
        assert_eq!(boundary_score(&chars("a "), &chars("b")), 2);
        assert_eq!(boundary_score(&chars("a-"), &chars("b")), 1);
        assert_eq!(boundary_score(&chars("a"), &chars("b")), 0);
    }

    #[test]
    fn overlap_lengths() {
        assert_eq!(common_overlap(&chars("abc"), &chars("bcd")), 2);
        assert_eq!(common_overlap(&chars("abc"), &chars("xyz")), 0);
        assert_eq!(common_overlap(&chars(""), &chars("abc")), 0);
    }
}
