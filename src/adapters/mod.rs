//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                  |
//! |-------------|--------------------|------------------------------|
//! | `hardware`  | SensorPort         | ESP32 ADC, GPIO, I2C         |
//! |             | PumpPort           | ESP32 GPIO                   |
//! | `log_sink`  | EventSink          | Serial log output            |
//! | `mqtt`      | BrokerPort, Link   | ESP-IDF MQTT client          |
//! | `wifi`      | Link               | ESP-IDF WiFi STA             |
//! | `time`      | —                  | ESP32 system timer           |
//! | `device_id` | —                  | eFuse factory MAC            |

pub mod device_id;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
