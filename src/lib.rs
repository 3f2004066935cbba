pub mod configuration;

pub mod time {
    pub mod utility;
    pub mod rangeofdates;

    pub mod holidayrule {
        pub mod easter;
        pub mod weekendobservation;
        pub mod holidayruleerror;
        pub mod holidayspec;
        pub mod datetext;
        pub mod holidayruleparser;
    }

    pub mod calendar {
        pub mod holidayspecsource;
        pub mod holidaycalendar;
    }

    pub mod workday {
        pub mod workdayclassifier;
        pub mod workdayrange;
    }
}
