use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("no nonce below {attempts} reaches difficulty {difficulty:#018x}")]
    Exhausted { attempts: u64, difficulty: u64 },
}
