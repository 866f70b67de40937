mod settings;

pub use settings::{
    ChannelsConfig, DeliveryConfig, LogFormat, LoggingConfig, OtelConfig, ServerConfig, Settings,
};
