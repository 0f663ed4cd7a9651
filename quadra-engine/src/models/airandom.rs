use super::POSITIONS;

/// Générateur pseudo-aléatoire « IA » : la récurrence congruentielle linéaire
/// publiée, graine = numéro de tirage. Les consommateurs s'appuient sur une
/// reproductibilité bit à bit par graine — ne pas remplacer par `rand`.
#[derive(Debug, Clone)]
pub struct AiRandom {
    state: u32,
}

impl AiRandom {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// state = (state × 1664525 + 1013904223) mod 2^32 ; chiffre = ⌊state / 2^32 × 10⌋.
    pub fn next_digit(&mut self) -> u8 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        ((self.state as f64 / 4_294_967_296.0) * 10.0) as u8
    }

    pub fn predict(&mut self) -> String {
        (0..POSITIONS).map(|_| (b'0' + self.next_digit()) as char).collect()
    }

    /// Prédiction canonique pour un tirage donné (graine = numéro de tirage).
    pub fn predict_for_draw(draw_number: u32) -> String {
        Self::new(draw_number).predict()
    }
}
