// ============================================================================
// FORMAS COMUNES DE RESPUESTA DEL BACKEND
// ============================================================================

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Listado que llega como array plano o envuelto en `{ "data": [...] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Plain(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Plain(items) => items,
            ListPayload::Wrapped { data } => data,
        }
    }
}

/// Objeto envuelto en `{ "data": ... }`
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Acepta `{data: T}` o `T` directamente
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybeEnveloped<T> {
    Wrapped { data: T },
    Plain(T),
}

impl<T> MaybeEnveloped<T> {
    pub fn into_inner(self) -> T {
        match self {
            MaybeEnveloped::Wrapped { data } => data,
            MaybeEnveloped::Plain(value) => value,
        }
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Número que el backend puede mandar como `1500` o `"1500.00"`
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value).unwrap_or(0.0))
}

/// Igual que `lenient_f64` pero conservando la ausencia (`null`)
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

/// Texto que puede llegar como número
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
    }

    #[test]
    fn test_listado_plano_y_envuelto() {
        let plain: ListPayload<Row> = serde_json::from_str(r#"[{"id":1},{"id":2}]"#).unwrap();
        assert_eq!(plain.into_vec().len(), 2);

        let wrapped: ListPayload<Row> = serde_json::from_str(r#"{"data":[{"id":7}]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![Row { id: 7 }]);
    }

    #[test]
    fn test_numeros_como_texto() {
        #[derive(Deserialize)]
        struct Money {
            #[serde(deserialize_with = "lenient_f64")]
            total: f64,
            #[serde(default, deserialize_with = "lenient_opt_f64")]
            variation: Option<f64>,
        }

        let m: Money = serde_json::from_str(r#"{"total":"1500000.00","variation":null}"#).unwrap();
        assert_eq!(m.total, 1_500_000.0);
        assert_eq!(m.variation, None);

        let m: Money = serde_json::from_str(r#"{"total":20}"#).unwrap();
        assert_eq!(m.total, 20.0);
        assert_eq!(m.variation, None);
    }
}
