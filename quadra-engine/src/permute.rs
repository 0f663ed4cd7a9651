use std::collections::BTreeSet;

use crate::error::EngineError;
use crate::models::{parse_digits, POSITIONS};

/// Permutations d'indices par l'algorithme de Heap, en itératif (pas de
/// récursion ni de tableau modifié en place par épissage).
fn index_permutations() -> Vec<[usize; POSITIONS]> {
    let mut out = Vec::with_capacity(24);
    let mut a = [0usize, 1, 2, 3];
    let mut c = [0usize; POSITIONS];
    out.push(a);

    let mut i = 0;
    while i < POSITIONS {
        if c[i] < i {
            if i % 2 == 0 {
                a.swap(0, i);
            } else {
                a.swap(c[i], i);
            }
            out.push(a);
            c[i] += 1;
            i = 0;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
    out
}

/// Tous les ordonnancements distincts du multiset de chiffres de `number`,
/// doublons fusionnés (ex. "1123" → 12 chaînes, pas 24). C'est le jeu d'achat
/// « box » ; le test de gain box lui-même passe par l'égalité des chiffres
/// triés, jamais par cette énumération.
pub fn permutations(number: &str) -> Result<Vec<String>, EngineError> {
    let digits = parse_digits(number)?;
    let mut distinct = BTreeSet::new();
    for perm in index_permutations() {
        let s: String = perm.iter().map(|&i| (b'0' + digits[i]) as char).collect();
        distinct.insert(s);
    }
    Ok(distinct.into_iter().collect())
}

/// Taille du jeu d'achat box : 24 / ∏(multiplicité!).
pub fn permutation_count(number: &str) -> Result<usize, EngineError> {
    Ok(permutations(number)?.len())
}
