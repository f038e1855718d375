diesel::table! {
    players (id) {
        id -> BigInt,
        name -> Text,
        enabled -> Bool,
        priority -> Integer,
        created_on -> BigInt,
        modified_on -> BigInt,
        data -> Text,
    }
}

diesel::table! {
    storage (id) {
        id -> BigInt,
        engine_type -> Text,
        display_name -> Text,
        enabled -> Bool,
        created_on -> BigInt,
        modified_on -> BigInt,
        data -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(players, storage,);
