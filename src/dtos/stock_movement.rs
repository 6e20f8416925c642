use serde::Deserialize;

use super::require_text;
use crate::error::AppError;
use crate::services::inventory::{StockDelivery, StockExit};

/// Query string of `POST /products/{product_id}/exit/`.
#[derive(Debug, Deserialize)]
pub struct ExitProductParams {
    pub quantity_exited: i32,
    pub exited_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}

impl TryFrom<ExitProductParams> for StockExit {
    type Error = AppError;

    fn try_from(params: ExitProductParams) -> Result<Self, Self::Error> {
        require_text("exited_by", &params.exited_by)?;
        require_text("recipient_name", &params.recipient_name)?;
        Ok(StockExit {
            quantity_exited: params.quantity_exited,
            exited_by: params.exited_by,
            recipient_name: params.recipient_name,
            recipient_contact: params.recipient_contact,
        })
    }
}

/// Query string of `POST /products/{product_id}/deliver/`.
#[derive(Debug, Deserialize)]
pub struct DeliverProductParams {
    pub quantity_delivered: i32,
    pub delivered_by: String,
    pub recipient_name: String,
    pub recipient_contact: String,
}

impl TryFrom<DeliverProductParams> for StockDelivery {
    type Error = AppError;

    fn try_from(params: DeliverProductParams) -> Result<Self, Self::Error> {
        require_text("delivered_by", &params.delivered_by)?;
        require_text("recipient_name", &params.recipient_name)?;
        Ok(StockDelivery {
            quantity_delivered: params.quantity_delivered,
            delivered_by: params.delivered_by,
            recipient_name: params.recipient_name,
            recipient_contact: params.recipient_contact,
        })
    }
}
