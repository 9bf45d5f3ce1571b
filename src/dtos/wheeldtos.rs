use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::wheelmodels::{LuckyWheelConfig, SpinState, WheelPrize};

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelConfigDto {
    pub is_active: bool,
    pub spin_cost: i64,
    pub spins_per_day: i32,
    pub prizes: Vec<WheelPrize>,
}

impl From<LuckyWheelConfig> for WheelConfigDto {
    fn from(config: LuckyWheelConfig) -> Self {
        Self {
            is_active: config.is_active,
            spin_cost: config.spin_cost,
            spins_per_day: config.spins_per_day,
            prizes: config.prizes.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelStateData {
    pub wheel: WheelConfigDto,
    pub spins: SpinState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpinResultData {
    pub prize: String,
    pub amount: i64,
    pub balance_after: i64,
    pub source: crate::models::wheelmodels::SpinSource,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BuySpinsDto {
    #[validate(range(min = 1, max = 100, message = "Amount must be between 1-100"))]
    pub amount: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuySpinsData {
    pub purchased_spins: i32,
    pub balance_after: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateWheelConfigDto {
    pub is_active: bool,

    #[validate(range(min = 0, message = "Spin cost cannot be negative"))]
    pub spin_cost: i64,

    #[validate(range(min = 0, message = "Spins per day cannot be negative"))]
    pub spins_per_day: i32,

    #[validate(length(min = 1, message = "At least one prize is required"))]
    pub prizes: Vec<WheelPrize>,
}
