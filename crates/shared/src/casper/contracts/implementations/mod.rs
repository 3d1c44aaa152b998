pub mod cep18_token;
pub mod stake_contract;
