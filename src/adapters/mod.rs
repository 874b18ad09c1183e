//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to              |
//! |-------------|--------------------|--------------------------|
//! | `hardware`  | PeripheralPort     | ESP32 GPIO, ADC1         |
//! |             | OutputSink (pin)   | output GPIO              |
//! | `console`   | ConsolePort        | Serial log output        |
//! |             | OutputSink         | any ConsolePort          |
//! | `log_sink`  | EventSink          | Serial log output        |
//! | `time`      | ClockPort          | ESP32 system timer       |
//! |             | DelayNs            | FreeRTOS `vTaskDelay`    |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod time;
