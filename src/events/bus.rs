//! Sincronizador de estado en vivo
//!
//! Publish-subscribe en proceso sobre canales broadcast de tokio: un canal
//! lógico por tipo de entidad. Cada mutación del store emite exactamente un
//! evento con el registro completo post-cambio (no un diff: simplifica los
//! consumidores a cambio de ancho de banda).
//!
//! La entrega es at-least-once y sin orden garantizado entre entidades ni
//! por id; un consumidor que necesite orden estricto debe comparar el campo
//! `updated_at` del registro y descartar eventos más viejos que lo que ya
//! tiene. El publish es fire-and-forget: un fan-out fallido jamás revierte
//! la mutación subyacente.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Capacidad del buffer por canal; los suscriptores lentos pierden eventos
/// viejos (broadcast::error::RecvError::Lagged) y deben re-sincronizar.
const CHANNEL_CAPACITY: usize = 256;

/// Tipo de entidad del evento - un canal lógico por tipo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Reservation,
    Shipment,
}

/// Clase de cambio sobre el registro persistido
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Evento de cambio con el registro completo post-cambio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub entity: EntityKind,
    pub kind: ChangeKind,
    pub record: serde_json::Value,
}

/// Bus de eventos compartido entre los mutadores y los dashboards
#[derive(Clone)]
pub struct EventBus {
    reservations: broadcast::Sender<ChangeEvent>,
    shipments: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (reservations, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (shipments, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            reservations,
            shipments,
        }
    }

    fn channel(&self, entity: EntityKind) -> &broadcast::Sender<ChangeEvent> {
        match entity {
            EntityKind::Reservation => &self.reservations,
            EntityKind::Shipment => &self.shipments,
        }
    }

    /// Suscribirse al canal de una entidad. Cerrar el receiver basta para
    /// desuscribirse; no queda ningún recurso colgando en el motor.
    pub fn subscribe(&self, entity: EntityKind) -> broadcast::Receiver<ChangeEvent> {
        self.channel(entity).subscribe()
    }

    /// Publicar un evento. Fire-and-forget: sin suscriptores el evento se
    /// descarta y solo se registra en el log, nunca es un error para el
    /// mutador.
    pub fn publish(&self, entity: EntityKind, kind: ChangeKind, record: serde_json::Value) {
        let event = ChangeEvent { entity, kind, record };
        match self.channel(entity).send(event) {
            Ok(receivers) => {
                debug!("📡 Evento {:?}/{:?} entregado a {} suscriptores", entity, kind, receivers);
            }
            Err(_) => {
                debug!("📡 Evento {:?}/{:?} sin suscriptores, descartado", entity, kind);
            }
        }
    }

    pub fn subscriber_count(&self, entity: EntityKind) -> usize {
        self.channel(entity).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

fn record_id(record: &serde_json::Value) -> Option<&str> {
    record.get("id").and_then(|v| v.as_str())
}

fn updated_at(record: &serde_json::Value) -> Option<&str> {
    // RFC3339 ordena lexicográficamente, la comparación de strings alcanza
    record.get("updated_at").and_then(|v| v.as_str())
}

/// Merge last-writer-wins de un evento sobre la colección local de un
/// consumidor: created inserta al frente, updated reemplaza por id
/// (descartando eventos más viejos que el registro retenido), deleted
/// elimina por id.
pub fn apply_change(collection: &mut Vec<serde_json::Value>, event: &ChangeEvent) {
    let Some(id) = record_id(&event.record) else {
        return;
    };

    match event.kind {
        ChangeKind::Created => {
            if !collection.iter().any(|r| record_id(r) == Some(id)) {
                collection.insert(0, event.record.clone());
            }
        }
        ChangeKind::Updated => {
            if let Some(held) = collection
                .iter_mut()
                .find(|r| record_id(r) == Some(id))
            {
                let stale = match (updated_at(held), updated_at(&event.record)) {
                    (Some(have), Some(incoming)) => incoming < have,
                    _ => false,
                };
                if !stale {
                    *held = event.record.clone();
                }
            } else {
                // Update de un registro que aún no tenemos: tratarlo como alta
                collection.insert(0, event.record.clone());
            }
        }
        ChangeKind::Deleted => {
            collection.retain(|r| record_id(r) != Some(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_delivers_one_event_with_full_record() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(EntityKind::Reservation);

        let record = json!({ "id": "r-1", "status": "pending", "total_amount": "500.00" });
        bus.publish(EntityKind::Reservation, ChangeKind::Created, record.clone());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Created);
        assert_eq!(event.record, record);
        // Exactamente un evento por mutación
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        // No debe entrar en pánico ni devolver error
        bus.publish(
            EntityKind::Shipment,
            ChangeKind::Deleted,
            json!({ "id": "s-9" }),
        );
        assert_eq!(bus.subscriber_count(EntityKind::Shipment), 0);
    }

    #[tokio::test]
    async fn test_channels_are_isolated_per_entity() {
        let bus = EventBus::new();
        let mut reservations = bus.subscribe(EntityKind::Reservation);
        let mut shipments = bus.subscribe(EntityKind::Shipment);

        bus.publish(
            EntityKind::Shipment,
            ChangeKind::Updated,
            json!({ "id": "s-1" }),
        );

        assert!(shipments.recv().await.is_ok());
        assert!(reservations.try_recv().is_err());
    }

    #[test]
    fn test_apply_created_prepends() {
        let mut local = vec![json!({ "id": "a" })];
        apply_change(
            &mut local,
            &ChangeEvent {
                entity: EntityKind::Reservation,
                kind: ChangeKind::Created,
                record: json!({ "id": "b" }),
            },
        );
        assert_eq!(local.len(), 2);
        assert_eq!(record_id(&local[0]), Some("b"));
    }

    #[test]
    fn test_apply_updated_replaces_by_id() {
        let mut local = vec![json!({ "id": "a", "status": "pending", "updated_at": "2025-01-01T00:00:00Z" })];
        apply_change(
            &mut local,
            &ChangeEvent {
                entity: EntityKind::Reservation,
                kind: ChangeKind::Updated,
                record: json!({ "id": "a", "status": "cancelled", "updated_at": "2025-01-02T00:00:00Z" }),
            },
        );
        assert_eq!(local.len(), 1);
        assert_eq!(local[0]["status"], "cancelled");
    }

    #[test]
    fn test_apply_discards_stale_update() {
        let mut local = vec![json!({ "id": "a", "status": "active", "updated_at": "2025-01-05T00:00:00Z" })];
        apply_change(
            &mut local,
            &ChangeEvent {
                entity: EntityKind::Reservation,
                kind: ChangeKind::Updated,
                record: json!({ "id": "a", "status": "confirmed", "updated_at": "2025-01-03T00:00:00Z" }),
            },
        );
        // Last-writer-wins: el evento viejo no pisa el registro más nuevo
        assert_eq!(local[0]["status"], "active");
    }

    #[test]
    fn test_apply_deleted_removes_by_id() {
        let mut local = vec![json!({ "id": "a" }), json!({ "id": "b" })];
        apply_change(
            &mut local,
            &ChangeEvent {
                entity: EntityKind::Reservation,
                kind: ChangeKind::Deleted,
                record: json!({ "id": "a" }),
            },
        );
        assert_eq!(local.len(), 1);
        assert_eq!(record_id(&local[0]), Some("b"));
    }
}
