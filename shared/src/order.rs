use crate::error::FormError;

pub const LOCATING_LABEL: &str = "Buscando localização...";
pub const LOCATE_IDLE_LABEL: &str = "Usar minha localização";
pub const LOCATION_APPLIED: &str = "Localização atual aplicada ao mapa.";
pub const LOCATION_FAILED: &str = "Não foi possível obter sua localização. Tente novamente.";
pub const LOCATION_UNSUPPORTED: &str = "Geolocalização não suportada neste dispositivo.";
pub const GEO_TIMEOUT_MS: u32 = 10_000;

/// Raw text of the quick order form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderForm {
    pub product: String,
    pub recipient: String,
    pub location: String,
    pub safety_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub recipient: String,
    pub location: String,
}

impl OrderConfirmation {
    pub fn message(&self) -> String {
        format!(
            "Pedido registrado para {}. Rota calculada para: {}.",
            self.recipient, self.location
        )
    }
}

impl OrderForm {
    pub fn submit(&self) -> Result<OrderConfirmation, FormError> {
        let product = self.product.trim();
        let recipient = self.recipient.trim();
        let location = self.location.trim();
        if product.is_empty() || recipient.is_empty() || location.is_empty() || !self.safety_confirmed {
            return Err(FormError::IncompleteOrder);
        }
        Ok(OrderConfirmation {
            recipient: recipient.to_string(),
            location: location.to_string(),
        })
    }
}
