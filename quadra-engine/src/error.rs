use thiserror::Error;

/// Taxonomie d'erreurs du moteur.
///
/// `InsufficientData` est récupérable : l'ensemble saute la contribution du
/// modèle concerné, le backtest saute le tirage sous test. `MalformedDraw`
/// signale une donnée amont corrompue et n'est jamais réessayée.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("données insuffisantes : {got} tirage(s) disponible(s), {required} requis")]
    InsufficientData { required: usize, got: usize },

    #[error("tirage malformé : numéro gagnant '{value}' (attendu exactement 4 chiffres)")]
    MalformedDraw { value: String },
}
