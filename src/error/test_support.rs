use super::{
    CodecError, ConfigError, ConvertError, StatsError, StoreError, ValidationError,
};

macro_rules! test_expectations {
    ($($error:ident),+ $(,)?) => {
        $(
            impl From<&'static str> for $error {
                fn from(message: &'static str) -> Self {
                    $error::TestExpectation { message }
                }
            }

            impl From<String> for $error {
                fn from(value: String) -> Self {
                    $error::TestExpectationValue {
                        message: "Test expectation failed",
                        value,
                    }
                }
            }
        )+
    };
}

test_expectations!(
    CodecError,
    ConfigError,
    ConvertError,
    StatsError,
    StoreError,
    ValidationError,
);
