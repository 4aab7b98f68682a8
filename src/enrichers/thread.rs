//! Thread identity enrichment

use crate::core::{
    LogEvent, LogEventEnricher, LogEventProperty, LogEventPropertyFactory, PropertyValue, Result,
};
use std::cell::OnceCell;

pub const THREAD_ID_PROPERTY: &str = "ThreadId";
pub const THREAD_NAME_PROPERTY: &str = "ThreadName";

// Per-thread caches so the id and name are computed once per thread
thread_local! {
    static THREAD_ID_CACHE: OnceCell<PropertyValue> = const { OnceCell::new() };
    static THREAD_NAME_CACHE: OnceCell<Option<PropertyValue>> = const { OnceCell::new() };
}

fn thread_id() -> PropertyValue {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .get_or_init(|| {
                // `ThreadId(7)` -> 7; keep the debug text if the format ever changes
                let text = format!("{:?}", std::thread::current().id());
                let digits: String = text.chars().filter(char::is_ascii_digit).collect();
                match digits.parse::<u64>() {
                    Ok(id) => PropertyValue::from(id),
                    Err(_) => PropertyValue::from(text),
                }
            })
            .clone()
    })
}

fn thread_name() -> Option<PropertyValue> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .get_or_init(|| std::thread::current().name().map(PropertyValue::from))
            .clone()
    })
}

/// Adds `ThreadId` and, for named threads, `ThreadName`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadEnricher;

impl ThreadEnricher {
    pub fn new() -> Self {
        Self
    }
}

impl LogEventEnricher for ThreadEnricher {
    fn enrich(&self, event: &mut LogEvent, _factory: &dyn LogEventPropertyFactory) -> Result<()> {
        if !event.contains_property(THREAD_ID_PROPERTY) {
            event.add_property_if_absent(LogEventProperty::new(THREAD_ID_PROPERTY, thread_id())?);
        }
        if let Some(name) = thread_name() {
            if !event.contains_property(THREAD_NAME_PROPERTY) {
                event.add_property_if_absent(LogEventProperty::new(THREAD_NAME_PROPERTY, name)?);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "thread"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogEventLevel, MessageTemplate, PropertyValueFactory};

    #[test]
    fn test_named_thread() {
        let handle = std::thread::Builder::new()
            .name("worker-1".to_string())
            .spawn(|| {
                let mut event = LogEvent::now(LogEventLevel::Debug, MessageTemplate::empty());
                ThreadEnricher::new()
                    .enrich(&mut event, &PropertyValueFactory::new())
                    .unwrap();
                event
            })
            .unwrap();
        let event = handle.join().unwrap();

        assert!(event.contains_property(THREAD_ID_PROPERTY));
        assert_eq!(
            event.property(THREAD_NAME_PROPERTY),
            Some(&PropertyValue::from("worker-1"))
        );
    }

    #[test]
    fn test_thread_id_is_stable() {
        assert_eq!(thread_id(), thread_id());
        assert!(matches!(thread_id(), PropertyValue::Scalar(_)));
    }
}
