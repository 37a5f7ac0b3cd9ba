//! Word lists backing the NLP engine's entity tagger.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const FIRST_NAMES: &[&str] = &[
    "aaron", "abigail", "adam", "adrian", "aisha", "alan", "albert", "alex", "alexander",
    "alice", "alicia", "amanda", "amelia", "amy", "ana", "andrea", "andrew", "angela",
    "anna", "anne", "anthony", "antonio", "arthur", "ashley", "barbara", "benjamin",
    "betty", "beth", "bill", "bob", "brandon", "brian", "bruce", "carlos", "carol",
    "caroline", "catherine", "charles", "charlie", "charlotte", "chloe", "chris",
    "christina", "christine", "christopher", "claire", "daniel", "david", "deborah",
    "dennis", "diana", "donald", "donna", "dorothy", "edward", "elena", "elizabeth",
    "ella", "emily", "emma", "eric", "ethan", "eva", "frank", "gabriel", "gary",
    "george", "grace", "gregory", "hannah", "harry", "heather", "helen", "henry",
    "isabella", "jack", "jacob", "james", "jane", "janet", "jason", "jeff", "jeffrey",
    "jennifer", "jessica", "jim", "joan", "joe", "john", "jonathan", "jose", "joseph",
    "joshua", "juan", "julia", "julie", "justin", "karen", "kate", "katherine", "kelly",
    "kenneth", "kevin", "kim", "laura", "lauren", "linda", "lisa", "liam", "lucas",
    "lucy", "luis", "maria", "marie", "mark", "martha", "mary", "matthew", "megan",
    "melissa", "michael", "michelle", "mike", "mohammed", "muhammad", "nancy", "natalie",
    "nathan", "nicholas", "nicole", "noah", "oliver", "olivia", "pamela", "patricia",
    "patrick", "paul", "peter", "priya", "rachel", "rahul", "raymond", "rebecca",
    "richard", "robert", "ronald", "rose", "ryan", "samantha", "samuel", "sandra",
    "sara", "sarah", "scott", "sharon", "sophia", "sophie", "stephanie", "stephen",
    "steve", "steven", "susan", "thomas", "timothy", "tom", "tyler", "victoria",
    "walter", "wei", "william", "zoe",
];

const LOCATIONS: &[&str] = &[
    // countries
    "argentina", "australia", "austria", "belgium", "brazil", "canada", "chile", "china",
    "colombia", "denmark", "egypt", "england", "finland", "france", "germany", "greece",
    "india", "indonesia", "ireland", "israel", "italy", "japan", "kenya", "mexico",
    "netherlands", "new zealand", "nigeria", "norway", "pakistan", "peru", "philippines",
    "poland", "portugal", "russia", "saudi arabia", "scotland", "singapore",
    "south africa", "south korea", "spain", "sweden", "switzerland", "thailand",
    "turkey", "ukraine", "united kingdom", "united states", "vietnam", "wales",
    // US states
    "alabama", "alaska", "arizona", "arkansas", "california", "colorado", "connecticut",
    "delaware", "florida", "georgia", "hawaii", "idaho", "illinois", "indiana", "iowa",
    "kansas", "kentucky", "louisiana", "maine", "maryland", "massachusetts", "michigan",
    "minnesota", "mississippi", "missouri", "montana", "nebraska", "nevada",
    "new hampshire", "new jersey", "new mexico", "new york", "north carolina",
    "north dakota", "ohio", "oklahoma", "oregon", "pennsylvania", "rhode island",
    "south carolina", "south dakota", "tennessee", "texas", "utah", "vermont",
    "virginia", "washington", "west virginia", "wisconsin", "wyoming",
    // cities
    "amsterdam", "athens", "atlanta", "austin", "bangalore", "bangkok", "barcelona",
    "beijing", "berlin", "boston", "brussels", "buenos aires", "cairo", "chicago",
    "copenhagen", "dallas", "delhi", "denver", "dubai", "dublin", "edinburgh",
    "hong kong", "houston", "istanbul", "jakarta", "lagos", "las vegas", "lisbon",
    "london", "los angeles", "madrid", "manchester", "melbourne", "miami", "milan",
    "montreal", "moscow", "mumbai", "munich", "nairobi", "new orleans", "oslo", "paris",
    "philadelphia", "phoenix", "prague", "rome", "san diego", "san francisco",
    "santiago", "seattle", "seoul", "shanghai", "stockholm", "sydney", "tokyo",
    "toronto", "vancouver", "vienna", "warsaw", "zurich",
];

const ORGANIZATION_SUFFIXES: &[&str] = &[
    "inc", "corp", "corporation", "co", "company", "llc", "ltd", "limited", "plc", "gmbh",
    "ag", "sa", "group", "holdings", "bank", "university", "college", "institute",
    "foundation", "association", "agency", "technologies", "labs", "partners",
    "hospital", "ministry", "council",
];

const PERSON_TITLES: &[&str] = &["mr", "mrs", "ms", "miss", "dr", "prof", "sir", "madam"];

pub static FIRST_NAME_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| FIRST_NAMES.iter().copied().collect());

pub static LOCATION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| LOCATIONS.iter().copied().collect());

pub static ORGANIZATION_SUFFIX_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ORGANIZATION_SUFFIXES.iter().copied().collect());

pub static PERSON_TITLE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| PERSON_TITLES.iter().copied().collect());

/// Longest multi-word entry in `LOCATIONS`, in words.
pub const MAX_LOCATION_WORDS: usize = 2;

pub fn is_first_name(word: &str) -> bool {
    FIRST_NAME_SET.contains(word.to_lowercase().as_str())
}

pub fn is_location(phrase: &str) -> bool {
    LOCATION_SET.contains(phrase.to_lowercase().as_str())
}

pub fn is_organization_suffix(word: &str) -> bool {
    ORGANIZATION_SUFFIX_SET.contains(word.to_lowercase().as_str())
}

pub fn is_person_title(word: &str) -> bool {
    PERSON_TITLE_SET.contains(word.to_lowercase().as_str())
}
