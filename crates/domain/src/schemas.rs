//! Schema registry: one table per mutable entity and one small table per
//! narrow-input action.

use crate::schema::{Check, DefaultValue, EntitySchema, FieldKind, FieldRule};

const MAX_255: Check = Check::MaxLength(255, "String must contain at most 255 character(s)");

/// Listing fields any publisher may set.
pub const LISTING_FIELDS: &[FieldRule] = &[
    FieldRule::required(
        "title",
        FieldKind::Text,
        &[
            Check::MinLength(5, "Title must be at least 5 characters"),
            MAX_255,
        ],
    ),
    FieldRule::optional(
        "description",
        FieldKind::Text,
        &[Check::MinLength(
            10,
            "Description must be at least 10 characters",
        )],
    ),
    FieldRule::required(
        "address",
        FieldKind::Text,
        &[Check::MinLength(5, "Address is required"), MAX_255],
    ),
    FieldRule::required(
        "city",
        FieldKind::Text,
        &[
            Check::MinLength(1, "City is required"),
            Check::MaxLength(100, "String must contain at most 100 character(s)"),
        ],
    ),
    FieldRule::required(
        "state",
        FieldKind::Text,
        &[
            Check::MinLength(1, "State is required"),
            Check::MaxLength(50, "String must contain at most 50 character(s)"),
        ],
    ),
    FieldRule::required(
        "zip_code",
        FieldKind::Text,
        &[
            Check::MinLength(1, "ZIP code is required"),
            Check::MaxLength(20, "String must contain at most 20 character(s)"),
        ],
    ),
    FieldRule::optional(
        "neighborhood",
        FieldKind::Text,
        &[Check::MaxLength(
            100,
            "String must contain at most 100 character(s)",
        )],
    ),
    FieldRule::required(
        "price",
        FieldKind::Number,
        &[Check::Positive("Price must be positive")],
    ),
    FieldRule::required(
        "property_type",
        FieldKind::Text,
        &[Check::MinLength(1, "Property type is required")],
    ),
    FieldRule::optional(
        "bedrooms",
        FieldKind::Number,
        &[Check::Integer, Check::Positive("Bedrooms must be positive")],
    ),
    FieldRule::optional(
        "bathrooms",
        FieldKind::Number,
        &[Check::Positive("Bathrooms must be positive")],
    ),
    FieldRule::optional(
        "square_footage",
        FieldKind::Number,
        &[
            Check::Integer,
            Check::Positive("Square footage must be positive"),
        ],
    ),
    FieldRule::defaulted(
        "parking",
        FieldKind::Boolean,
        DefaultValue::Bool(false),
        &[],
    ),
    FieldRule::defaulted(
        "parking_fee",
        FieldKind::Number,
        DefaultValue::Int(0),
        &[
            Check::Integer,
            Check::NonNegative("Parking fee cannot be negative"),
        ],
    ),
    FieldRule::defaulted(
        "pet_friendly",
        FieldKind::Boolean,
        DefaultValue::Bool(false),
        &[],
    ),
    FieldRule::defaulted(
        "pet_deposit",
        FieldKind::Number,
        DefaultValue::Int(0),
        &[
            Check::Integer,
            Check::NonNegative("Pet deposit cannot be negative"),
        ],
    ),
    FieldRule::defaulted("utilities", FieldKind::List, DefaultValue::EmptyList, &[]),
    FieldRule::defaulted(
        "utilities_cost",
        FieldKind::Number,
        DefaultValue::Int(0),
        &[
            Check::Integer,
            Check::NonNegative("Utilities cost cannot be negative"),
        ],
    ),
    FieldRule::optional(
        "security_deposit",
        FieldKind::Number,
        &[
            Check::Integer,
            Check::Positive("Security deposit must be positive"),
        ],
    ),
    FieldRule::optional(
        "minimum_lease",
        FieldKind::Number,
        &[
            Check::Integer,
            Check::Positive("Minimum lease must be positive"),
        ],
    ),
    FieldRule::optional("available_date", FieldKind::Text, &[]),
    FieldRule::optional(
        "application_fee",
        FieldKind::Number,
        &[
            Check::Integer,
            Check::NonNegative("Application fee cannot be negative"),
        ],
    ),
    FieldRule::defaulted("amenities", FieldKind::List, DefaultValue::EmptyList, &[]),
    FieldRule::defaulted(
        "image_urls",
        FieldKind::List,
        DefaultValue::EmptyList,
        &[Check::EachUrl("Invalid image URL")],
    ),
    FieldRule::optional("property_manager", FieldKind::Text, &[]),
    FieldRule::optional("contact_phone", FieldKind::Text, &[]),
    FieldRule::optional(
        "contact_email",
        FieldKind::Text,
        &[Check::Email("Invalid email")],
    ),
    FieldRule::optional("latitude", FieldKind::Number, &[]),
    FieldRule::optional("longitude", FieldKind::Number, &[]),
    FieldRule::defaulted(
        "nearby_transportation",
        FieldKind::List,
        DefaultValue::EmptyList,
        &[],
    ),
];

/// Moderation flags. Accepted on update, applied only for admins.
pub const LISTING_PRIVILEGED_FIELDS: &[FieldRule] = &[
    FieldRule::optional("approved", FieldKind::Boolean, &[]),
    FieldRule::optional("featured", FieldKind::Boolean, &[]),
];

/// Full listing creation.
pub const CREATE_LISTING: EntitySchema = EntitySchema::new("create_listing", &[LISTING_FIELDS]);

/// Listing update: every field optional, same per-field constraints.
pub const UPDATE_LISTING: EntitySchema =
    EntitySchema::new("update_listing", &[LISTING_FIELDS, LISTING_PRIVILEGED_FIELDS]).partial();

/// Admin approval of a listing.
pub const APPROVE_LISTING: EntitySchema = EntitySchema::new(
    "approve_listing",
    &[&[
        FieldRule::required("id", FieldKind::Text, &[Check::Uuid("Invalid listing ID")]),
        FieldRule::required("approved", FieldKind::Boolean, &[]),
        FieldRule::optional("featured", FieldKind::Boolean, &[]),
    ]],
);

/// Bookmarking a listing.
pub const SAVE_LISTING: EntitySchema = EntitySchema::new(
    "save_listing",
    &[&[
        FieldRule::required(
            "listing_id",
            FieldKind::Text,
            &[Check::Uuid("Invalid listing ID")],
        ),
        FieldRule::optional("notes", FieldKind::Text, &[]),
    ]],
);

/// Editing the notes of a saved listing.
pub const UPDATE_SAVED_LISTING: EntitySchema = EntitySchema::new(
    "update_saved_listing",
    &[&[
        FieldRule::required(
            "id",
            FieldKind::Text,
            &[Check::Uuid("Invalid saved listing ID")],
        ),
        FieldRule::optional("notes", FieldKind::Text, &[]),
    ]],
);

/// Removing a saved listing.
pub const REMOVE_SAVED_LISTING: EntitySchema = EntitySchema::new(
    "remove_saved_listing",
    &[&[FieldRule::required(
        "id",
        FieldKind::Text,
        &[Check::Uuid("Invalid uuid")],
    )]],
);

/// Deleting an uploaded listing image by its public URL.
pub const DELETE_IMAGE: EntitySchema = EntitySchema::new(
    "delete_image",
    &[&[FieldRule::required(
        "imageUrl",
        FieldKind::Text,
        &[Check::Url("Invalid image URL")],
    )]],
);

/// Profile fields.
pub const PROFILE: EntitySchema = EntitySchema::new(
    "profile",
    &[&[
        FieldRule::required(
            "full_name",
            FieldKind::Text,
            &[Check::MinLength(1, "Full name is required"), MAX_255],
        ),
        FieldRule::optional("avatar_url", FieldKind::Text, &[Check::Url("Invalid url")]),
        FieldRule::defaulted(
            "role",
            FieldKind::Text,
            DefaultValue::Text("user"),
            &[Check::OneOf(&["user", "agent", "admin"])],
        ),
    ]],
);
