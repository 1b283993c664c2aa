//! Well-known event type and entity type name constants.
//!
//! Event type names route a dispatched event to the triggers targeting
//! it, and the payload field names each event carries are the contract
//! trigger and template authors write against. Changing either is a
//! breaking change for persisted triggers.

/// A material's stock level was (re-)examined. Payload fields:
/// `materialId`, `materialName`, `currentStock`, `minStock`,
/// `criticalStock`, `unit`.
pub const EVENT_STOCK_LEVEL_CHANGE: &str = "stock_level_change";

/// A non-terminal delivery has passed its scheduled time. Payload
/// fields: `deliveryId`, `supplier`, `materialName`, `quantity`,
/// `status`, `scheduledDate`, `daysOverdue`.
pub const EVENT_DELIVERY_DELAYED: &str = "delivery_delayed";

/// A quality test has a failing result. Payload fields: `testId`,
/// `testType`, `materialName`, `result`, `measuredValue`, `testedAt`.
pub const EVENT_QUALITY_TEST_FAILED: &str = "quality_test_failed";

/// A task is past its due date. Payload fields: `taskId`, `title`,
/// `assigneeId`, `assigneeName`, `priority`, `status`, `dueDate`,
/// `daysOverdue`.
pub const EVENT_TASK_OVERDUE: &str = "task_overdue";

/// A task was completed. Payload fields: `taskId`, `title`,
/// `assigneeId`, `assigneeName`, `priority`, `completedAt`.
pub const EVENT_TASK_COMPLETED: &str = "task_completed";

/// Entity type recorded on execution log rows for material events.
pub const ENTITY_MATERIAL: &str = "material";

/// Entity type recorded on execution log rows for delivery events.
pub const ENTITY_DELIVERY: &str = "delivery";

/// Entity type recorded on execution log rows for quality test events.
pub const ENTITY_QUALITY_TEST: &str = "quality_test";

/// Entity type recorded on execution log rows for task events.
pub const ENTITY_TASK: &str = "task";
