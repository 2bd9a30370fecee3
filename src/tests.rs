use crate::preprime::preprimes;
use crate::{is_commafree, max_code_size, Search, Word};
use proptest::prelude::*;
use rand::random;

/// Sorted digit-string rendering of a code, for comparing against the
/// published answers.
fn digits(code: &[Word]) -> Vec<String> {
    let mut words: Vec<String> = code
        .iter()
        .map(|w| w.iter().map(|d| d.to_string()).collect())
        .collect();
    words.sort();
    words
}

fn sorted_answer(words: &[&str]) -> Vec<String> {
    let mut answer: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    answer.sort();
    answer
}

#[test]
fn preprime_enumeration_binary() {
    let result: Vec<(Vec<u8>, usize)> = preprimes(2, 3).collect();
    assert_eq!(
        result,
        vec![
            (vec![0, 0, 0], 1),
            (vec![0, 0, 1], 3),
            (vec![0, 1, 0], 2),
            (vec![0, 1, 1], 3),
            (vec![1, 1, 1], 1),
        ]
    );
}

#[test]
fn preprime_enumeration_ternary() {
    let result: Vec<(Vec<u8>, usize)> = preprimes(3, 4).collect();
    assert_eq!(result.len(), 32);
    assert_eq!(result[0], (vec![0, 0, 0, 0], 1));
    assert_eq!(result[4], (vec![0, 0, 1, 1], 4));
    assert_eq!(result[18], (vec![0, 2, 1, 0], 3));
    assert_eq!(result[31], (vec![2, 2, 2, 2], 1));
}

#[test]
fn commafree_predicate() {
    assert!(is_commafree(&[]));
    assert!(is_commafree(&[[0, 0, 0, 1]]));
    assert!(is_commafree(&[[0, 0, 0, 1], [0, 0, 1, 1], [0, 1, 1, 1]]));

    // a periodic word collides with its own square
    assert!(!is_commafree(&[[0, 1, 0, 1]]));
    // two rotations of one word collide
    assert!(!is_commafree(&[[0, 0, 0, 1], [0, 0, 1, 0]]));
}

#[test]
fn binary_codes_complete() {
    let mut codes: Vec<Vec<String>> = Search::new(2, 3)
        .unwrap()
        .map(|code| digits(&code))
        .collect();
    codes.sort();

    let expect: Vec<Vec<String>> = [
        ["0001", "0011", "0111"],
        ["0001", "0110", "0111"],
        ["0001", "0110", "1110"],
        ["0001", "0111", "1001"],
        ["0001", "1001", "1011"],
        ["0001", "1001", "1101"],
        ["0001", "1001", "1110"],
        ["0001", "1100", "1101"],
        ["0010", "0011", "1011"],
        ["0010", "0011", "1101"],
        ["0010", "0011", "1110"],
        ["0010", "0110", "0111"],
        ["0010", "0110", "1110"],
        ["0010", "1100", "1101"],
    ]
    .iter()
    .map(|code| code.iter().map(|w| w.to_string()).collect())
    .collect();

    assert_eq!(codes, expect);
}

#[test]
fn binary_search_matches_brute_force() {
    // all aperiodic binary words except the two fixed exclusions
    let mut words: Vec<Word> = Vec::new();
    for (rep, _) in preprimes(2, 4).filter(|&(_, j)| j == 4) {
        let mut word: Word = [rep[0], rep[1], rep[2], rep[3]];
        for _ in 0..4 {
            if word != [0, 1, 0, 0] && word != [1, 0, 0, 0] {
                words.push(word);
            }
            word = [word[1], word[2], word[3], word[0]];
        }
    }
    assert_eq!(words.len(), 10);

    let mut brute: Vec<Vec<String>> = Vec::new();
    for i in 0..words.len() {
        for j in i + 1..words.len() {
            for k in j + 1..words.len() {
                let code = [words[i], words[j], words[k]];
                if is_commafree(&code) {
                    brute.push(digits(&code));
                }
            }
        }
    }
    brute.sort();

    let mut found: Vec<Vec<String>> = Search::new(2, 3)
        .unwrap()
        .map(|code| digits(&code))
        .collect();
    found.sort();

    assert_eq!(found, brute);
}

#[test]
fn ternary_codes_full_size() {
    let raw: Vec<Vec<Word>> = Search::new(3, 18).unwrap().collect();
    assert_eq!(raw.len(), 72);
    for code in &raw {
        assert_eq!(code.len(), 18);
        assert!(is_commafree(code));
    }
    let codes: Vec<Vec<String>> = raw.iter().map(|code| digits(code)).collect();

    let common = [
        "0001", "0002", "1001", "1002", "1102", "2001", "2002", "2011", "2012", "2102", "2112",
    ];
    for b in &[["2122"], ["2212"]] {
        for c in &[["0102", "1011", "1012"], ["2010", "1101", "2101"]] {
            for d in &[["1202", "2202", "2111"], ["2021", "2022", "1112"]] {
                let mut answer: Vec<String> = common
                    .iter()
                    .chain(b.iter())
                    .chain(c.iter())
                    .chain(d.iter())
                    .map(|w| w.to_string())
                    .collect();
                answer.sort();
                assert!(codes.contains(&answer));
            }
        }
    }

    let common = [
        "0001", "0020", "0021", "0022", "1001", "1020", "1021", "1022", "1201", "1202", "1221",
        "2001", "2201", "2202",
    ];
    for b in &[["1121"], ["1211"]] {
        for c in &[["1011", "1012", "2221"], ["1101", "2101", "1222"]] {
            let mut answer: Vec<String> = common
                .iter()
                .chain(b.iter())
                .chain(c.iter())
                .map(|w| w.to_string())
                .collect();
            answer.sort();
            assert!(codes.contains(&answer));
        }
    }
}

/// Exhausts the full m = 4 search; takes a long while, run with
/// `cargo test --release -- --ignored`.
#[test]
#[ignore]
fn quaternary_codes_full_search() {
    let raw: Vec<Vec<Word>> = Search::new(4, 57).unwrap().collect();
    assert_eq!(raw.len(), 1152);
    for code in &raw {
        assert!(is_commafree(code));
    }
    let codes: Vec<Vec<String>> = raw.iter().map(|code| digits(code)).collect();

    let answer1 = sorted_answer(&[
        "0001", "0002", "0003", "0201", "0203", "1001", "1002", "1003", "1011", "1013", "1021",
        "1022", "1023", "1031", "1032", "1033", "1201", "1203", "1211", "1213", "1221", "1223",
        "1231", "1232", "1233", "1311", "1321", "1323", "1331", "2001", "2002", "2003", "2021",
        "2022", "2023", "2201", "2203", "2221", "2223", "3001", "3002", "3003", "3011", "3013",
        "3021", "3022", "3023", "3031", "3032", "3033", "3201", "3203", "3221", "3223", "3321",
        "3323", "3331",
    ]);
    let answer2 = sorted_answer(&[
        "0010", "0020", "0030", "0110", "0112", "0113", "0120", "0121", "0122", "0130", "0131",
        "0132", "0133", "0210", "0212", "0213", "0220", "0222", "0230", "0310", "0312", "0313",
        "0320", "0322", "0330", "0332", "0333", "1110", "1112", "1113", "2010", "2030", "2110",
        "2112", "2113", "2210", "2212", "2213", "2230", "2310", "2312", "2313", "2320", "2322",
        "2330", "2332", "2333", "3110", "3112", "3113", "3210", "3212", "3213", "3230", "3310",
        "3312", "3313",
    ]);
    assert!(codes.contains(&answer1));
    assert!(codes.contains(&answer2));
}

#[test]
fn random_subsets_stay_commafree() {
    let base: Vec<Word> = Search::new(3, 18).unwrap().next().unwrap();
    assert!(is_commafree(&base));

    for _ in 0..100 {
        let sub: Vec<Word> = base.iter().cloned().filter(|_| random::<bool>()).collect();
        assert!(is_commafree(&sub));
    }
}

proptest! {
    #[test]
    fn preprime_primes_count_cycle_classes(m in 2usize..=7) {
        let mut prev: Option<Vec<u8>> = None;
        let mut primes = 0;
        for (word, j) in preprimes(m, 4) {
            prop_assert!(word.iter().all(|&d| (d as usize) < m));
            if let Some(p) = &prev {
                prop_assert!(p < &word);
            }
            if j == 4 {
                primes += 1;
            }
            prev = Some(word);
        }
        prop_assert_eq!(primes, max_code_size(m));
    }
}
