use super::domain::Role;

pub(crate) struct SampleAccount {
    pub full_name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
    pub governorate: &'static str,
}

/// Demo accounts created on an empty database; every account starts active.
pub(crate) const SAMPLE_ACCOUNTS: [SampleAccount; 5] = [
    SampleAccount {
        full_name: "Portal Administrator",
        email: "admin@example.com",
        password: "admin123",
        role: Role::GeneralAdmin,
        governorate: "Cairo",
    },
    SampleAccount {
        full_name: "Alexandria Governor",
        email: "governor@example.com",
        password: "governor123",
        role: Role::Governor,
        governorate: "Alexandria",
    },
    SampleAccount {
        full_name: "Cairo Clerk",
        email: "cairo.clerk@example.com",
        password: "user123",
        role: Role::User,
        governorate: "Cairo",
    },
    SampleAccount {
        full_name: "Alexandria Clerk",
        email: "alexandria.clerk@example.com",
        password: "user123",
        role: Role::User,
        governorate: "Alexandria",
    },
    SampleAccount {
        full_name: "Giza Clerk",
        email: "giza.clerk@example.com",
        password: "user123",
        role: Role::User,
        governorate: "Giza",
    },
];
