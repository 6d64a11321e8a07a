use toml::Value;

/// A statically declared type descriptor for a bunfig value.
#[derive(Debug)]
pub enum Schema {
    String,
    Boolean,
    /// Integer or float.
    Number,
    Array(&'static Schema),
    /// A table with a known set of properties. Only listed properties are
    /// checked (and emitted); `required` ones must be present.
    Object {
        properties: &'static [(&'static str, Schema)],
        required: &'static [&'static str],
    },
    /// A table whose keys are free-form and whose values all share a type.
    Map(&'static Schema),
    /// Exactly one alternative must match.
    OneOf(&'static [Schema]),
}

impl Schema {
    pub fn validate(&self, value: &Value) -> bool {
        use Schema::*;
        match (self, value) {
            (String, Value::String(_)) => true,
            (Boolean, Value::Boolean(_)) => true,
            (Number, Value::Integer(_) | Value::Float(_)) => true,
            (Array(items), Value::Array(values)) => values.iter().all(|v| items.validate(v)),
            (
                Object {
                    properties,
                    required,
                },
                Value::Table(table),
            ) => {
                required.iter().all(|key| table.contains_key(*key))
                    && properties.iter().all(|(key, schema)| {
                        table.get(*key).map_or(true, |value| schema.validate(value))
                    })
            }
            (Map(values), Value::Table(table)) => table.values().all(|v| values.validate(v)),
            (OneOf(alternatives), value) => {
                alternatives.iter().filter(|s| s.validate(value)).count() == 1
            }
            _ => false,
        }
    }

    /// Whether values of this type are written as their own `[section]`.
    pub fn is_table(&self) -> bool {
        matches!(self, Schema::Object { .. } | Schema::Map(_))
    }
}

const STRING_ARRAY: Schema = Schema::Array(&Schema::String);

/// The bunfig sections we know how to write, in output order. Dotted keys
/// address nested tables.
pub static BUNFIG_SCHEMA: &[(&str, Schema)] = &[
    ("preload", STRING_ARRAY),
    ("jsx", Schema::String),
    ("jsxFactory", Schema::String),
    ("jsxFragment", Schema::String),
    ("jsxImportSource", Schema::String),
    ("smol", Schema::Boolean),
    ("logLevel", Schema::String),
    ("define", Schema::Map(&Schema::String)),
    ("loader", Schema::Map(&Schema::String)),
    ("telemetry", Schema::Boolean),
    (
        "test",
        Schema::Object {
            properties: &[
                ("preload", STRING_ARRAY),
                ("smol", Schema::Boolean),
                ("coverage", Schema::Boolean),
                (
                    "coverageThreshold",
                    Schema::OneOf(&[
                        Schema::Number,
                        Schema::Object {
                            properties: &[
                                ("line", Schema::Number),
                                ("function", Schema::Number),
                                ("statement", Schema::Number),
                            ],
                            required: &[],
                        },
                    ]),
                ),
                ("coverageSkipTestFiles", Schema::Boolean),
            ],
            required: &[],
        },
    ),
    (
        "install",
        Schema::Object {
            properties: &[
                ("optional", Schema::Boolean),
                ("dev", Schema::Boolean),
                ("peer", Schema::Boolean),
                ("production", Schema::Boolean),
                ("exact", Schema::Boolean),
                ("auto", Schema::String),
                ("frozenLockfile", Schema::Boolean),
                ("dryRun", Schema::Boolean),
                ("globalDir", Schema::String),
                ("globalBinDir", Schema::String),
                (
                    "registry",
                    Schema::OneOf(&[
                        Schema::String,
                        Schema::Object {
                            properties: &[("url", Schema::String), ("token", Schema::String)],
                            required: &[],
                        },
                    ]),
                ),
            ],
            required: &[],
        },
    ),
    (
        "install.scopes",
        Schema::Map(&Schema::OneOf(&[
            Schema::String,
            Schema::Object {
                properties: &[("url", Schema::String), ("token", Schema::String)],
                required: &["url", "token"],
            },
            Schema::Object {
                properties: &[
                    ("url", Schema::String),
                    ("username", Schema::String),
                    ("password", Schema::String),
                ],
                required: &["url", "username", "password"],
            },
        ])),
    ),
    (
        "install.cache",
        Schema::Object {
            properties: &[
                ("dir", Schema::String),
                ("disable", Schema::Boolean),
                ("disableManifest", Schema::Boolean),
            ],
            required: &[],
        },
    ),
    (
        "install.lockfile",
        Schema::Object {
            properties: &[("save", Schema::Boolean), ("print", Schema::String)],
            required: &[],
        },
    ),
    (
        "run",
        Schema::Object {
            properties: &[
                ("shell", Schema::String),
                ("bun", Schema::Boolean),
                ("silent", Schema::Boolean),
            ],
            required: &[],
        },
    ),
];
